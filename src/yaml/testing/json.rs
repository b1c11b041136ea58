//! JSON view of parsed documents
//!
//! Renders a [Document] as a `serde_json::Value` with anchors unwrapped and aliases resolved,
//! so parse results can be compared against other YAML implementations or written as JSON
//! literals in tests. Block scalars become strings. Non-finite floats have no JSON form and
//! become `null`.

use serde_json::{Map, Number, Value};

use crate::yaml::ast::{AbstractSyntaxTree, Document, DocumentLayout, Node, ScalarValue};

/// One value per document.
pub fn tree_to_json(tree: &AbstractSyntaxTree) -> Vec<Value> {
    tree.documents.iter().map(document_to_json).collect()
}

pub fn document_to_json(document: &Document) -> Value {
    match document.layout {
        DocumentLayout::Empty => Value::Null,
        DocumentLayout::Mapping => entries(&document.nodes),
        DocumentLayout::Sequence => items(&document.nodes),
        DocumentLayout::Single => document
            .nodes
            .first()
            .map_or(Value::Null, node_to_json),
    }
}

pub fn node_to_json(node: &Node) -> Value {
    match node.resolve() {
        Node::Scalar(scalar) => scalar_to_json(&scalar.value),
        Node::Mapping(mapping) => entries(&mapping.entries),
        Node::Sequence(sequence) => items(&sequence.items),
        Node::MultilineString(block) | Node::FoldedString(block) => {
            Value::String(block.text.clone())
        }
        Node::Anchor(_) | Node::Alias(_) => Value::Null,
    }
}

pub fn scalar_to_json(value: &ScalarValue) -> Value {
    match value {
        ScalarValue::Null => Value::Null,
        ScalarValue::Bool(b) => Value::Bool(*b),
        ScalarValue::Integer(i) => Value::Number((*i).into()),
        ScalarValue::Float(x) => Number::from_f64(*x).map_or(Value::Null, Value::Number),
        ScalarValue::String(s) => Value::String(s.clone()),
    }
}

fn entries(nodes: &[Node]) -> Value {
    let mut map = Map::new();
    for node in nodes {
        let key = node.key().unwrap_or_default().to_string();
        map.insert(key, node_to_json(node));
    }
    Value::Object(map)
}

fn items(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(node_to_json).collect())
}
