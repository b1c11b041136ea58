//! AST
//!
//!     The parser's output. A stream parses into an [AbstractSyntaxTree]: an ordered list of
//!     [Document]s, each a list of top-level [Node]s plus the document's anchor table.
//!
//!     Nodes are a closed enum; see [node] for the variants and [scalar] for how scalar text
//!     turns into typed values. [treeviz] renders a tree for snapshots and debugging.

pub mod document;
pub mod node;
pub mod position;
pub mod scalar;
pub mod treeviz;

pub use document::{AbstractSyntaxTree, AnchorTable, Document, DocumentLayout};
pub use node::{
    AliasNode, AnchorNode, Chomping, CollectionStyle, MappingNode, Node, NodeKind, ScalarNode,
    ScalarStyle, SequenceNode, TextBlockNode,
};
pub use position::Position;
pub use scalar::ScalarValue;
pub use treeviz::to_treeviz_str;
