//! Core token types and helpers shared across the tokenizer, the classifier and tooling.

pub mod core;
pub mod formatting;

pub use core::{Token, TokenType};
pub use formatting::{describe, to_grammar_string};
