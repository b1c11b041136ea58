//! Pipeline
//!
//!     Wires the stages together: lines go to the [Tokenizer], token batches go to the
//!     [StructuralBuilder], and the builder's tree comes out once the lines run out.
//!
//!         lines ──▶ Tokenizer ──▶ Vec<Token> per line ──▶ StructuralBuilder ──▶ tree
//!
//!     Two ways to drive it:
//!
//!         - synchronously, through [parse], [parse_with_config], [parse_str] and
//!           [parse_reader], all built on [LineParser]
//!         - as concurrent tokio tasks, see [concurrent]
//!
//!     Both produce the same tree, and the same error, for the same input. Parsing is all or
//!     nothing: on error no partial tree is returned.

pub mod concurrent;

use std::io::BufRead;

use crate::yaml::ast::AbstractSyntaxTree;
use crate::yaml::config::ParserConfig;
use crate::yaml::error::ParseError;
use crate::yaml::lexing::Tokenizer;
use crate::yaml::parsing::StructuralBuilder;
use crate::yaml::source::{self, ReaderLines};

/// Line-at-a-time driver pairing one tokenizer with one builder.
#[derive(Debug, Clone)]
pub struct LineParser {
    tokenizer: Tokenizer,
    builder: StructuralBuilder,
    line_number: usize,
}

impl LineParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            builder: StructuralBuilder::new(config),
            line_number: 0,
        }
    }

    /// Tokenize and build the next line. `line` carries no terminator.
    pub fn push_line(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_number += 1;
        let tokens = self.tokenizer.tokenize(line, self.line_number)?;
        self.builder.feed(tokens)
    }

    pub fn lines_seen(&self) -> usize {
        self.line_number
    }

    pub fn finish(self) -> Result<AbstractSyntaxTree, ParseError> {
        let tree = self.builder.finish()?;
        log::debug!(
            "parsed {} line(s) into {} document(s)",
            self.line_number,
            tree.len()
        );
        Ok(tree)
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

/// Parse a sequence of lines with the default configuration.
pub fn parse<I, S>(lines: I) -> Result<AbstractSyntaxTree, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with_config(lines, &ParserConfig::default())
}

pub fn parse_with_config<I, S>(
    lines: I,
    config: &ParserConfig,
) -> Result<AbstractSyntaxTree, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = LineParser::new(*config);
    for line in lines {
        parser.push_line(line.as_ref())?;
    }
    parser.finish()
}

/// Parse in-memory source text.
pub fn parse_str(source: &str) -> Result<AbstractSyntaxTree, ParseError> {
    parse(source::lines(source))
}

/// Parse everything a reader yields. Invalid UTF-8 and read failures are positioned errors.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<AbstractSyntaxTree, ParseError> {
    let mut parser = LineParser::default();
    for line in ReaderLines::new(reader) {
        parser.push_line(&line?)?;
    }
    parser.finish()
}
