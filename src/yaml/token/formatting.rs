//! Human readable renderings of token sequences
//!
//! Used by error messages and tests. Grammar notation renders a sequence as
//! `<data><colon><data><newline>`, which is also how grammar productions print.

use super::core::{Token, TokenType};

/// Render a sequence of token types in grammar notation.
pub fn to_grammar_string<'a>(kinds: impl IntoIterator<Item = &'a TokenType>) -> String {
    kinds
        .into_iter()
        .map(TokenType::to_grammar_string)
        .collect::<Vec<_>>()
        .join("")
}

/// Short description of a token for diagnostics: `'name'` for data, `':'` for symbols.
pub fn describe(token: &Token) -> String {
    match token.kind {
        TokenType::Data => format!("'{}'", token.text),
        TokenType::Comment => "comment".to_string(),
        TokenType::Newline => "end of line".to_string(),
        TokenType::Indentation => "indentation".to_string(),
        TokenType::SingleQuote => "single-quoted scalar".to_string(),
        TokenType::DoubleQuote => "double-quoted scalar".to_string(),
        TokenType::Dash => "'-'".to_string(),
        TokenType::Period => "'.'".to_string(),
        TokenType::DocumentStart => "'---'".to_string(),
        TokenType::DocumentEnd => "'...'".to_string(),
        kind => TokenType::SYMBOLS
            .iter()
            .find(|(_, symbol)| *symbol == kind)
            .map(|(c, _)| format!("'{}'", c))
            .unwrap_or_else(|| kind.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_string_of_sequence() {
        let kinds = [
            TokenType::Data,
            TokenType::Colon,
            TokenType::Data,
            TokenType::Newline,
        ];
        assert_eq!(to_grammar_string(&kinds), "<data><colon><data><newline>");
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&Token::new(TokenType::Data, "abc", 1, 1)), "'abc'");
        assert_eq!(describe(&Token::symbol(TokenType::OpenBrace, 1, 1)), "'{'");
        assert_eq!(describe(&Token::symbol(TokenType::Newline, 1, 1)), "end of line");
    }
}
