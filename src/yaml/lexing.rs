//! Lexer
//!
//!     Tokenization happens one line at a time, in two passes over each line:
//!
//!         1. Raw classification with a logos lexer. See [base_tokenization](base_tokenization).
//!            Whitespace runs, indicator characters and words, nothing more.
//!
//!         2. Token assembly. See [tokenizer](tokenizer). A small state machine walks the raw
//!            pieces and produces the typed tokens the parser consumes: indentation, document
//!            markers, quoted and plain scalars, comments and symbols.
//!
//!     Splitting it this way keeps the logos lexer free of context. Whether a `,` ends a
//!     scalar, whether `#` starts a comment or whether a line is block scalar content depends
//!     on what came before, and that lives in the tokenizer.

pub mod base_tokenization;
pub mod tokenizer;

pub use tokenizer::{tokenize_str, Tokenizer};
