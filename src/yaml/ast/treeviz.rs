//! Treeviz formatter for the tree
//!
//! A one line per node rendering of an [AbstractSyntaxTree], used for snapshots and
//! debugging. Nesting is drawn with box connectors, each line is
//! `<connector> <icon> <key>: <summary>` (the key part only for keyed nodes), and block
//! scalar text is truncated to 30 characters.
//!
//! Example:
//!
//!   ⧉ document
//!   ├─ ≔ server: block mapping
//!   │  ├─ ◦ host: "localhost"
//!   │  └─ ◦ port: 8080
//!   └─ ☰ tags: flow sequence
//!      └─ ◦ "web"
//!
//! Icons
//!     Document: ⧉
//!     Mapping: ≔
//!     Sequence: ☰
//!     Scalar: ◦
//!     Literal block scalar: ¶
//!     Folded block scalar: ↵
//!     Anchor: ⊕
//!     Alias: →

use super::document::{AbstractSyntaxTree, Document};
use super::node::Node;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn icon(node: &Node) -> &'static str {
    match node {
        Node::Mapping(_) => "≔",
        Node::Sequence(_) => "☰",
        Node::Scalar(_) => "◦",
        Node::MultilineString(_) => "¶",
        Node::FoldedString(_) => "↵",
        Node::Anchor(_) => "⊕",
        Node::Alias(_) => "→",
    }
}

fn summary(node: &Node) -> String {
    match node {
        Node::Scalar(scalar) => scalar.value.to_string(),
        Node::Mapping(_) | Node::Sequence(_) => node.kind().to_string(),
        Node::MultilineString(block) => format!("|{:?}", truncate(&block.text, 30)),
        Node::FoldedString(block) => format!(">{:?}", truncate(&block.text, 30)),
        Node::Anchor(anchor) => format!("&{}", anchor.name),
        Node::Alias(alias) => format!("*{}", alias.name),
    }
}

fn label(node: &Node) -> String {
    match node.key() {
        Some(key) => format!("{} {}: {}", icon(node), key, summary(node)),
        None => format!("{} {}", icon(node), summary(node)),
    }
}

fn children(node: &Node) -> Vec<&Node> {
    match node {
        Node::Anchor(anchor) => vec![anchor.node.as_ref()],
        _ => node.children().iter().collect(),
    }
}

fn format_node(node: &Node, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!("{}{} {}\n", prefix, connector, label(node)));

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let nested = children(node);
    for (index, child) in nested.iter().enumerate() {
        format_node(child, &child_prefix, index + 1 == nested.len(), output);
    }
}

/// Render one document.
pub fn document_to_treeviz(document: &Document) -> String {
    let mut output = String::from("⧉ document");
    if document.explicit {
        output.push_str(" ---");
    }
    output.push('\n');
    for (index, node) in document.nodes.iter().enumerate() {
        format_node(node, "", index + 1 == document.nodes.len(), &mut output);
    }
    output
}

/// Render every document of the tree, one after the other.
pub fn to_treeviz_str(tree: &AbstractSyntaxTree) -> String {
    tree.documents.iter().map(document_to_treeviz).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::ast::{
        CollectionStyle, MappingNode, Position, ScalarNode, ScalarStyle, ScalarValue,
    };

    fn scalar(key: Option<&str>, value: ScalarValue) -> Node {
        Node::Scalar(ScalarNode {
            key: key.map(str::to_string),
            value,
            style: ScalarStyle::Plain,
            position: Position::new(1, 1),
        })
    }

    #[test]
    fn test_nested_rendering() {
        let mut server = MappingNode::new(
            Some("server".into()),
            CollectionStyle::Block,
            Position::new(1, 1),
        );
        server.insert(scalar(Some("host"), ScalarValue::String("localhost".into())));
        server.insert(scalar(Some("port"), ScalarValue::Integer(8080)));
        let mut document = Document::new(false);
        document.nodes.push(Node::Mapping(server));
        document.nodes.push(scalar(Some("debug"), ScalarValue::Bool(false)));

        assert_eq!(
            document_to_treeviz(&document),
            "⧉ document\n\
             ├─ ≔ server: block mapping\n\
             │  ├─ ◦ host: \"localhost\"\n\
             │  └─ ◦ port: 8080\n\
             └─ ◦ debug: false\n"
        );
    }

    #[test]
    fn test_truncates_long_text() {
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
