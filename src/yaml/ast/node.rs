//! Node model
//!
//!     A closed sum type over the node kinds the parser builds. Every node carries an optional
//!     key (the mapping key it sits under, if any) and the position where it starts.
//!
//!     Mappings keep their entries as keyed child nodes. Keys are unique within a mapping:
//!     inserting an existing key replaces the earlier entry in place.
//!
//!     Anchored nodes are shared through `Arc` with the document's anchor table. An alias holds
//!     the anchor name and the node that name was bound to when the alias was read. Targets are
//!     always complete earlier nodes, so [Node::resolve] walks a finite chain.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::position::Position;
use super::scalar::ScalarValue;

/// The closed set of node kinds. Only the two block containers are nestable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Scalar,
    Document,
    MultilineString,
    FoldedString,
    Anchor,
    SequenceFlow,
    SequenceBlock,
    MappingFlow,
    MappingBlock,
    Alias,
}

impl NodeKind {
    /// Whether nodes of this kind may own children at a deeper indentation.
    pub fn is_nestable(self) -> bool {
        matches!(self, NodeKind::SequenceBlock | NodeKind::MappingBlock)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Document => "document",
            NodeKind::MultilineString => "literal block scalar",
            NodeKind::FoldedString => "folded block scalar",
            NodeKind::Anchor => "anchor",
            NodeKind::SequenceFlow => "flow sequence",
            NodeKind::SequenceBlock => "block sequence",
            NodeKind::MappingFlow => "flow mapping",
            NodeKind::MappingBlock => "block mapping",
            NodeKind::Alias => "alias",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CollectionStyle {
    Block,
    Flow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

/// Trailing line break handling of block scalars (`|`, `|-`, `|+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Chomping {
    /// Keep one final line break.
    #[default]
    Clip,
    /// Drop all final line breaks.
    Strip,
    /// Keep every final line break.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarNode {
    pub key: Option<String>,
    pub value: ScalarValue,
    pub style: ScalarStyle,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingNode {
    pub key: Option<String>,
    pub style: CollectionStyle,
    pub entries: Vec<Node>,
    pub position: Position,
}

impl MappingNode {
    pub fn new(key: Option<String>, style: CollectionStyle, position: Position) -> Self {
        Self {
            key,
            style,
            entries: Vec::new(),
            position,
        }
    }

    /// Insert a keyed entry. An existing entry with the same key is replaced in place and
    /// returned.
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        insert_keyed(&mut self.entries, node)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|entry| entry.key() == Some(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(Node::key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceNode {
    pub key: Option<String>,
    pub style: CollectionStyle,
    pub items: Vec<Node>,
    pub position: Position,
}

impl SequenceNode {
    pub fn new(key: Option<String>, style: CollectionStyle, position: Position) -> Self {
        Self {
            key,
            style,
            items: Vec::new(),
            position,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Content of a literal (`|`) or folded (`>`) block scalar, already joined and chomped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlockNode {
    pub key: Option<String>,
    pub text: String,
    pub chomping: Chomping,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorNode {
    pub key: Option<String>,
    pub name: String,
    pub node: Arc<Node>,
    pub position: Position,
}

/// Use of an anchor. `target` is the node the anchor named when the alias was read, so a
/// later redefinition of the same name does not change it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasNode {
    pub key: Option<String>,
    pub name: String,
    pub position: Position,
    #[serde(skip)]
    pub target: Arc<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Node {
    Scalar(ScalarNode),
    Mapping(MappingNode),
    Sequence(SequenceNode),
    MultilineString(TextBlockNode),
    FoldedString(TextBlockNode),
    Anchor(AnchorNode),
    Alias(AliasNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Mapping(m) => match m.style {
                CollectionStyle::Block => NodeKind::MappingBlock,
                CollectionStyle::Flow => NodeKind::MappingFlow,
            },
            Node::Sequence(s) => match s.style {
                CollectionStyle::Block => NodeKind::SequenceBlock,
                CollectionStyle::Flow => NodeKind::SequenceFlow,
            },
            Node::MultilineString(_) => NodeKind::MultilineString,
            Node::FoldedString(_) => NodeKind::FoldedString,
            Node::Anchor(_) => NodeKind::Anchor,
            Node::Alias(_) => NodeKind::Alias,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Node::Scalar(n) => n.key.as_deref(),
            Node::Mapping(n) => n.key.as_deref(),
            Node::Sequence(n) => n.key.as_deref(),
            Node::MultilineString(n) | Node::FoldedString(n) => n.key.as_deref(),
            Node::Anchor(n) => n.key.as_deref(),
            Node::Alias(n) => n.key.as_deref(),
        }
    }

    pub fn set_key(&mut self, key: Option<String>) {
        let slot = match self {
            Node::Scalar(n) => &mut n.key,
            Node::Mapping(n) => &mut n.key,
            Node::Sequence(n) => &mut n.key,
            Node::MultilineString(n) | Node::FoldedString(n) => &mut n.key,
            Node::Anchor(n) => &mut n.key,
            Node::Alias(n) => &mut n.key,
        };
        *slot = key;
    }

    pub fn position(&self) -> Position {
        match self {
            Node::Scalar(n) => n.position,
            Node::Mapping(n) => n.position,
            Node::Sequence(n) => n.position,
            Node::MultilineString(n) | Node::FoldedString(n) => n.position,
            Node::Anchor(n) => n.position,
            Node::Alias(n) => n.position,
        }
    }

    /// Child nodes of collections; empty for every other kind.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Mapping(m) => &m.entries,
            Node::Sequence(s) => &s.items,
            _ => &[],
        }
    }

    /// Mapping entry lookup; `None` for anything but a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(m) => m.get(key),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Node::Scalar(n) => Some(&n.value),
            _ => None,
        }
    }

    /// Text of a string scalar or block scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(ScalarNode {
                value: ScalarValue::String(s),
                ..
            }) => Some(s.as_str()),
            Node::MultilineString(n) | Node::FoldedString(n) => Some(n.text.as_str()),
            _ => None,
        }
    }

    /// Follow aliases and unwrap anchors down to the node that carries the value.
    pub fn resolve(&self) -> &Node {
        let mut node = self;
        loop {
            node = match node {
                Node::Alias(alias) => &alias.target,
                Node::Anchor(anchor) => &anchor.node,
                other => return other,
            };
        }
    }

    /// Every alias used in this subtree.
    pub fn aliases(&self) -> Vec<&AliasNode> {
        let mut found = Vec::new();
        collect_aliases(self, &mut found);
        found
    }
}

fn collect_aliases<'a>(node: &'a Node, found: &mut Vec<&'a AliasNode>) {
    match node {
        Node::Alias(alias) => found.push(alias),
        Node::Anchor(anchor) => collect_aliases(&anchor.node, found),
        _ => {
            for child in node.children() {
                collect_aliases(child, found);
            }
        }
    }
}

/// Keyed insertion shared by mappings and documents: same key replaces in place.
pub(crate) fn insert_keyed(entries: &mut Vec<Node>, node: Node) -> Option<Node> {
    let existing = node
        .key()
        .and_then(|key| entries.iter().position(|entry| entry.key() == Some(key)));
    match existing {
        Some(index) => Some(std::mem::replace(&mut entries[index], node)),
        None => {
            entries.push(node);
            None
        }
    }
}
