//! Test factories for creating tokens succinctly

use crate::yaml::lexing::Tokenizer;
use crate::yaml::token::{Token, TokenType};

/// Make a single token at a 1-based line and column.
pub fn mk_token(kind: TokenType, text: &str, line: usize, column: usize) -> Token {
    Token::new(kind, text, line, column)
}

/// Make a vector of tokens from `(kind, text, line, column)` tuples.
pub fn mk_tokens(specs: &[(TokenType, &str, usize, usize)]) -> Vec<Token> {
    specs
        .iter()
        .map(|(kind, text, line, column)| mk_token(*kind, text, *line, *column))
        .collect()
}

/// Kinds of a token sequence, in order.
pub fn kinds(tokens: &[Token]) -> Vec<TokenType> {
    tokens.iter().map(|token| token.kind).collect()
}

/// Tokenize `lines` with a fresh tokenizer, one batch per line. Panics on tokenizer errors.
pub fn tokenize_lines(lines: &[&str]) -> Vec<Vec<Token>> {
    let mut tokenizer = Tokenizer::new();
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            tokenizer
                .tokenize(line, index + 1)
                .unwrap_or_else(|err| panic!("line {} failed to tokenize: {}", index + 1, err))
        })
        .collect()
}
