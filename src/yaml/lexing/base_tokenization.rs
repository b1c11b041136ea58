//! Raw character classes of one line
//!
//!     The logos lexer here knows nothing about quoting, flow context or indentation. It only
//!     splits a line into runs of spaces, runs of tabs, single indicator characters and words
//!     (maximal runs of everything else). The [tokenizer](super::tokenizer) walks these pieces
//!     with its own state to assemble the real tokens.
//!
//!     Control characters match no rule, so they surface as lexer errors and become
//!     `InvalidCharacter` upstream.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RawToken {
    #[regex(r" +")]
    Spaces,
    #[regex(r"\t+")]
    Tabs,

    #[token(":")]
    Colon,
    #[token("-")]
    Dash,
    #[token(".")]
    Period,
    #[token("|")]
    Pipe,
    #[token(",")]
    Comma,
    #[token(">")]
    GreaterThan,
    #[token("?")]
    QuestionMark,
    #[token("!")]
    ExclamationMark,
    #[token("&")]
    Ampersand,
    #[token("*")]
    Asterisk,
    #[token("#")]
    Hash,
    #[token("'")]
    SingleQuote,
    #[token("\"")]
    DoubleQuote,
    #[token("\\")]
    Backslash,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,

    // Anything that is not whitespace, a control character or an indicator above
    #[regex(r#"[^\x00-\x20\x7f:\-.|,>?!&*#'"\\\[\]{}]+"#)]
    Word,
}

impl RawToken {
    pub fn is_whitespace(self) -> bool {
        matches!(self, RawToken::Spaces | RawToken::Tabs)
    }

    /// Characters that delimit plain scalars inside flow collections.
    pub fn is_flow_delimiter(self) -> bool {
        matches!(
            self,
            RawToken::Comma
                | RawToken::OpenBracket
                | RawToken::CloseBracket
                | RawToken::OpenBrace
                | RawToken::CloseBrace
        )
    }
}

/// One raw piece of a line: its class, text, byte range and 1-based character column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPiece<'a> {
    pub kind: RawToken,
    pub text: &'a str,
    pub span: Range<usize>,
    pub column: usize,
}

/// A character no rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCharacter {
    pub character: char,
    pub column: usize,
}

/// Split a line (without its terminator) into raw pieces.
pub fn tokenize(line: &str) -> Result<Vec<RawPiece<'_>>, InvalidCharacter> {
    let mut lexer = RawToken::lexer(line);
    let mut pieces = Vec::new();
    let mut column = 1;

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        match result {
            Ok(kind) => pieces.push(RawPiece {
                kind,
                text,
                span: lexer.span(),
                column,
            }),
            Err(()) => {
                return Err(InvalidCharacter {
                    character: text.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
                    column,
                })
            }
        }
        column += text.chars().count();
    }

    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<RawToken> {
        tokenize(line)
            .expect("line to lex")
            .into_iter()
            .map(|piece| piece.kind)
            .collect()
    }

    #[test]
    fn test_key_value() {
        assert_eq!(
            kinds("name: value"),
            vec![
                RawToken::Word,
                RawToken::Colon,
                RawToken::Spaces,
                RawToken::Word
            ]
        );
    }

    #[test]
    fn test_indicators_split_words() {
        assert_eq!(
            kinds("3.14"),
            vec![RawToken::Word, RawToken::Period, RawToken::Word]
        );
        assert_eq!(
            kinds("[a,b]"),
            vec![
                RawToken::OpenBracket,
                RawToken::Word,
                RawToken::Comma,
                RawToken::Word,
                RawToken::CloseBracket
            ]
        );
    }

    #[test]
    fn test_columns_count_characters() {
        let pieces = tokenize("ñ: é").expect("line to lex");
        let columns: Vec<usize> = pieces.iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![1, 2, 3, 4]);
        assert_eq!(pieces[3].span, 4..6);
    }

    #[test]
    fn test_mixed_whitespace_runs() {
        assert_eq!(
            kinds("  \tx"),
            vec![RawToken::Spaces, RawToken::Tabs, RawToken::Word]
        );
    }

    #[test]
    fn test_control_character_is_rejected() {
        let err = tokenize("ab\u{7}c").unwrap_err();
        assert_eq!(err.column, 3);
        assert_eq!(err.character, '\u{7}');
    }
}
