//! Documents and the tree
//!
//!     An [AbstractSyntaxTree] is the ordered list of documents found in one stream. Each
//!     [Document] owns its top-level nodes and the anchor table built while parsing it; anchors
//!     never leak across document boundaries.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::node::Node;

/// Anchored nodes of one document, by anchor name.
///
/// The table shares each anchored node with the `Anchor` node that declared it. Redefining a
/// name rebinds it for aliases read afterwards; aliases already read keep their target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnchorTable {
    anchors: BTreeMap<String, Arc<Node>>,
}

impl AnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, node: Arc<Node>) -> Option<Arc<Node>> {
        self.anchors.insert(name.into(), node)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Node>> {
        self.anchors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.anchors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.anchors.keys().map(String::as_str)
    }
}

/// Shape of a document's top level: keyed entries, sequence entries or one bare value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DocumentLayout {
    #[default]
    Empty,
    Mapping,
    Sequence,
    Single,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Opened by a `---` marker rather than by content.
    pub explicit: bool,
    pub layout: DocumentLayout,
    pub nodes: Vec<Node>,
    pub anchors: AnchorTable,
}

impl Document {
    pub fn new(explicit: bool) -> Self {
        Self {
            explicit,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level entry by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.key() == Some(key))
    }

}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AbstractSyntaxTree {
    pub documents: Vec<Document>,
}

impl AbstractSyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn first(&self) -> Option<&Document> {
        self.documents.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::ast::{AliasNode, AnchorNode, Position, ScalarNode, ScalarStyle, ScalarValue};

    fn value(text: &str) -> Node {
        Node::Scalar(ScalarNode {
            key: None,
            value: ScalarValue::String(text.to_string()),
            style: ScalarStyle::Plain,
            position: Position::new(1, 1),
        })
    }

    #[test]
    fn test_top_level_nodes_resolve_through_anchors() {
        let anchored = Arc::new(value("shared"));
        let mut document = Document::new(false);
        document.anchors.insert("a", Arc::clone(&anchored));
        document.nodes.push(Node::Anchor(AnchorNode {
            key: Some("x".into()),
            name: "a".into(),
            node: Arc::clone(&anchored),
            position: Position::new(1, 1),
        }));
        document.nodes.push(Node::Alias(AliasNode {
            key: Some("y".into()),
            name: "a".into(),
            position: Position::new(2, 1),
            target: Arc::clone(&anchored),
        }));

        assert_eq!(document.get("x").map(Node::resolve), Some(anchored.as_ref()));
        assert_eq!(document.get("y").map(Node::resolve), Some(anchored.as_ref()));
        assert_eq!(document.anchors.names().collect::<Vec<_>>(), vec!["a"]);
    }
}
