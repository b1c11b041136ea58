//! Token definitions
//!
//!     A token is an immutable value: a type tag, a text payload and the 1-based line and
//!     column where it starts. Symbols carry no text; Data, Indentation, Comment and the
//!     document markers carry what they matched.
//!
//!     Columns count characters, not bytes, so positions stay meaningful for non-ASCII
//!     content.

use serde::Serialize;
use std::fmt;

use crate::yaml::ast::Position;

/// The closed set of token types produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TokenType {
    Data,
    Colon,
    Dash,
    Indentation,
    Newline,
    Pipe,
    Comma,
    GreaterThan,
    QuestionMark,
    ExclamationMark,
    Ampersand,
    Asterisk,
    Comment,
    SingleQuote,
    DoubleQuote,
    /// Reserved for marker grammar; content periods are always data.
    Period,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    DocumentStart,
    DocumentEnd,
}

impl TokenType {
    /// Single-character symbols, in the order the tokenizer checks them.
    pub const SYMBOLS: [(char, TokenType); 12] = [
        (':', TokenType::Colon),
        ('|', TokenType::Pipe),
        (',', TokenType::Comma),
        ('>', TokenType::GreaterThan),
        ('?', TokenType::QuestionMark),
        ('!', TokenType::ExclamationMark),
        ('&', TokenType::Ampersand),
        ('*', TokenType::Asterisk),
        ('[', TokenType::OpenBracket),
        (']', TokenType::CloseBracket),
        ('{', TokenType::OpenBrace),
        ('}', TokenType::CloseBrace),
    ];

    /// Whether this token opens or closes a flow collection.
    pub fn is_flow_indicator(self) -> bool {
        matches!(
            self,
            TokenType::OpenBracket
                | TokenType::CloseBracket
                | TokenType::OpenBrace
                | TokenType::CloseBrace
                | TokenType::Comma
        )
    }

    pub fn is_quote(self) -> bool {
        matches!(self, TokenType::SingleQuote | TokenType::DoubleQuote)
    }

    pub fn is_document_marker(self) -> bool {
        matches!(self, TokenType::DocumentStart | TokenType::DocumentEnd)
    }

    /// Format token type as grammar notation: `<token-name>`
    ///
    /// Examples:
    /// - Data -> `<data>`
    /// - OpenBracket -> `<open-bracket>`
    /// - DocumentStart -> `<document-start>`
    pub fn to_grammar_string(&self) -> String {
        let name = match self {
            TokenType::Data => "data",
            TokenType::Colon => "colon",
            TokenType::Dash => "dash",
            TokenType::Indentation => "indentation",
            TokenType::Newline => "newline",
            TokenType::Pipe => "pipe",
            TokenType::Comma => "comma",
            TokenType::GreaterThan => "greater-than",
            TokenType::QuestionMark => "question-mark",
            TokenType::ExclamationMark => "exclamation-mark",
            TokenType::Ampersand => "ampersand",
            TokenType::Asterisk => "asterisk",
            TokenType::Comment => "comment",
            TokenType::SingleQuote => "single-quote",
            TokenType::DoubleQuote => "double-quote",
            TokenType::Period => "period",
            TokenType::OpenBracket => "open-bracket",
            TokenType::CloseBracket => "close-bracket",
            TokenType::OpenBrace => "open-brace",
            TokenType::CloseBrace => "close-brace",
            TokenType::DocumentStart => "document-start",
            TokenType::DocumentEnd => "document-end",
        };
        format!("<{}>", name)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Data => "DATA",
            TokenType::Colon => "COLON",
            TokenType::Dash => "DASH",
            TokenType::Indentation => "INDENTATION",
            TokenType::Newline => "NEWLINE",
            TokenType::Pipe => "PIPE",
            TokenType::Comma => "COMMA",
            TokenType::GreaterThan => "GREATER_THAN",
            TokenType::QuestionMark => "QUESTION_MARK",
            TokenType::ExclamationMark => "EXCLAMATION_MARK",
            TokenType::Ampersand => "AMPERSAND",
            TokenType::Asterisk => "ASTERISK",
            TokenType::Comment => "COMMENT",
            TokenType::SingleQuote => "SINGLE_QUOTE",
            TokenType::DoubleQuote => "DOUBLE_QUOTE",
            TokenType::Period => "PERIOD",
            TokenType::OpenBracket => "OPEN_BRACKET",
            TokenType::CloseBracket => "CLOSE_BRACKET",
            TokenType::OpenBrace => "OPEN_BRACE",
            TokenType::CloseBrace => "CLOSE_BRACE",
            TokenType::DocumentStart => "DOCUMENT_START",
            TokenType::DocumentEnd => "DOCUMENT_END",
        };
        write!(f, "{}", name)
    }
}

/// A typed slice of one source line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenType,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenType, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// A zero-text symbol token.
    pub fn symbol(kind: TokenType, line: usize, column: usize) -> Self {
        Self::new(kind, String::new(), line, column)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn is(&self, kind: TokenType) -> bool {
        self.kind == kind
    }

    /// Indentation level carried by an Indentation token (0 for any other token).
    pub fn indentation_level(&self) -> usize {
        match self.kind {
            TokenType::Indentation => self.text.chars().count(),
            _ => 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({:?})", self.kind, self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_to_grammar_string() {
        assert_eq!(TokenType::Data.to_grammar_string(), "<data>");
        assert_eq!(TokenType::OpenBracket.to_grammar_string(), "<open-bracket>");
        assert_eq!(
            TokenType::DocumentStart.to_grammar_string(),
            "<document-start>"
        );
    }

    #[test]
    fn test_indentation_level_counts_characters() {
        let spaces = Token::new(TokenType::Indentation, "    ", 1, 1);
        let tabs = Token::new(TokenType::Indentation, "\t\t", 1, 1);
        assert_eq!(spaces.indentation_level(), 4);
        assert_eq!(tabs.indentation_level(), 2);
        assert_eq!(Token::symbol(TokenType::Colon, 1, 3).indentation_level(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::new(TokenType::Data, "name", 1, 1).to_string(), "DATA(\"name\")");
        assert_eq!(Token::symbol(TokenType::Colon, 1, 5).to_string(), "COLON");
    }
}
