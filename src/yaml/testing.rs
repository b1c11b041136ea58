//! Testing utilities
//!
//! # Parser Testing Guidelines
//!
//! ## Rule 1: Assert on the whole shape with assert_ast
//!
//! Asserting node counts alone says little. What a parser test needs to pin down is the
//! shape of the tree: which kinds sit where, under which keys, with which values. Matching
//! on `Node` variants by hand for that is long and hides the intent:
//!
//! ```rust-example
//! match &tree.documents[0].nodes[0] {
//!     Node::Mapping(m) => match m.get("port") {
//!         Some(Node::Scalar(s)) => assert_eq!(s.value, ScalarValue::Integer(8080)),
//!         _ => panic!("expected scalar"),
//!     },
//!     _ => panic!("expected mapping"),
//! }
//! ```
//!
//! With the fluent API the same check reads as the document it describes, and a failure
//! names the path that broke (`documents[0].server.port: Expected scalar 8080, found ...`):
//!
//! ```rust-example
//! use yamlite::yaml::testing::assert_ast;
//!
//! assert_ast(&tree).document(0, |doc| {
//!     doc.entry("server", |server| {
//!         server.kind(NodeKind::MappingBlock)
//!             .entry("port", |port| { port.integer(8080); });
//!     });
//! });
//! ```
//!
//! ## Rule 2: Errors are asserted by kind and position
//!
//! Messages are for humans and may be reworded. Tests check `err.kind` and
//! `err.position()`, never the message text.
//!
//! ## Rule 3: Build tokens with the factories
//!
//! Tokenizer and parser unit tests spell expected tokens with [factories::mk_token] and
//! compare token kinds with [factories::kinds].
//!
//! ## Comparing against other implementations
//!
//! [json] turns a parsed document into a `serde_json::Value`, with aliases resolved, so
//! results can be compared against other YAML parsers for the supported subset.

pub mod ast_assertions;
pub mod factories;
pub mod json;

pub use ast_assertions::{assert_ast, DocumentAssertion, NodeAssertion, TreeAssertion};
pub use json::{document_to_json, tree_to_json};
