//! # yamlite
//!
//! A parser for the commonly used subset of YAML: block mappings and sequences, flow
//! collections, plain and quoted scalars, literal and folded block scalars, anchors and
//! aliases, comments and multi-document streams.
//!
//! File Layout
//!
//!     Everything lives under [yaml]. Source text moves through three stages, each in its
//!     own module:
//!
//!         src/yaml/lexing     per-line tokenizer (logos base + stateful assembly)
//!         src/yaml/parsing    indentation manager, grammar classifier, frames, builder
//!         src/yaml/ast        the resulting tree: documents, nodes, anchors
//!
//!     The [pipeline](yaml::pipeline) module wires the stages together, either as a plain
//!     call chain or as concurrent tasks.
//!
//! For testing guidelines and helpers, see the [testing module](yaml::testing).

pub mod yaml;

pub use yaml::ast::{AbstractSyntaxTree, Document, Node, NodeKind, ScalarValue};
pub use yaml::config::ParserConfig;
pub use yaml::error::{ErrorKind, ParseError};
pub use yaml::pipeline::{parse, parse_reader, parse_str, parse_with_config};
