//! Fluent assertion API for parsed trees

use crate::yaml::ast::{
    AbstractSyntaxTree, Chomping, Document, DocumentLayout, Node, NodeKind, ScalarStyle,
    ScalarValue,
};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a tree
pub fn assert_ast(tree: &AbstractSyntaxTree) -> TreeAssertion<'_> {
    TreeAssertion { tree }
}

fn summarize(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|node| match node.key() {
            Some(key) => format!("{}: {}", key, node.kind()),
            None => node.kind().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tree and Document Assertions
// ============================================================================

pub struct TreeAssertion<'a> {
    tree: &'a AbstractSyntaxTree,
}

impl<'a> TreeAssertion<'a> {
    /// Assert the number of documents in the stream
    pub fn document_count(self, expected: usize) -> Self {
        assert_eq!(
            self.tree.len(),
            expected,
            "Expected {} documents, found {}",
            expected,
            self.tree.len()
        );
        self
    }

    /// Assert on a specific document by index
    pub fn document<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(DocumentAssertion<'a>),
    {
        assert!(
            index < self.tree.len(),
            "Document index {} out of bounds ({} documents)",
            index,
            self.tree.len()
        );
        assertion(DocumentAssertion {
            doc: &self.tree.documents[index],
            context: format!("documents[{}]", index),
        });
        self
    }
}

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
    context: String,
}

impl<'a> DocumentAssertion<'a> {
    pub fn explicit(self, expected: bool) -> Self {
        assert_eq!(
            self.doc.explicit, expected,
            "{}: Expected explicit = {}",
            self.context, expected
        );
        self
    }

    pub fn layout(self, expected: DocumentLayout) -> Self {
        assert_eq!(
            self.doc.layout, expected,
            "{}: Expected layout {:?}, found {:?}",
            self.context, expected, self.doc.layout
        );
        self
    }

    /// Assert the number of top-level nodes
    pub fn node_count(self, expected: usize) -> Self {
        let actual = self.doc.nodes.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} nodes, found {} nodes: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.doc.nodes)
        );
        self
    }

    /// Assert on a top-level node by index
    pub fn node<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assert!(
            index < self.doc.nodes.len(),
            "{}: Node index {} out of bounds ({} nodes)",
            self.context,
            index,
            self.doc.nodes.len()
        );
        assertion(NodeAssertion {
            node: &self.doc.nodes[index],
            context: format!("{}.nodes[{}]", self.context, index),
        });
        self
    }

    /// Assert on a top-level node by key
    pub fn entry<F>(self, key: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = self.doc.get(key).unwrap_or_else(|| {
            panic!(
                "{}: No top-level entry '{}' in [{}]",
                self.context,
                key,
                summarize(&self.doc.nodes)
            )
        });
        assertion(NodeAssertion {
            node,
            context: format!("{}.{}", self.context, key),
        });
        self
    }

    pub fn anchor_names(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.doc.anchors.names().collect();
        assert_eq!(
            actual, expected,
            "{}: Expected anchors {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn kind(self, expected: NodeKind) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: Expected {}, found {}",
            self.context,
            expected,
            self.node.kind()
        );
        self
    }

    pub fn key(self, expected: &str) -> Self {
        assert_eq!(
            self.node.key(),
            Some(expected),
            "{}: Expected key '{}', found {:?}",
            self.context,
            expected,
            self.node.key()
        );
        self
    }

    pub fn no_key(self) -> Self {
        assert!(
            self.node.key().is_none(),
            "{}: Expected no key, found {:?}",
            self.context,
            self.node.key()
        );
        self
    }

    /// Assert the node starts at the given line and column
    pub fn at(self, line: usize, column: usize) -> Self {
        let position = self.node.position();
        assert_eq!(
            (position.line, position.column),
            (line, column),
            "{}: Expected position {}:{}, found {}",
            self.context,
            line,
            column,
            position
        );
        self
    }

    pub fn scalar(self, expected: ScalarValue) -> Self {
        match self.node.as_scalar() {
            Some(actual) => assert_eq!(
                actual, &expected,
                "{}: Expected scalar {}, found {}",
                self.context, expected, actual
            ),
            None => panic!(
                "{}: Expected Scalar, found {}",
                self.context,
                self.node.kind()
            ),
        }
        self
    }

    pub fn string(self, expected: &str) -> Self {
        self.scalar(ScalarValue::String(expected.to_string()))
    }

    pub fn integer(self, expected: i64) -> Self {
        self.scalar(ScalarValue::Integer(expected))
    }

    pub fn boolean(self, expected: bool) -> Self {
        self.scalar(ScalarValue::Bool(expected))
    }

    pub fn null(self) -> Self {
        self.scalar(ScalarValue::Null)
    }

    pub fn style(self, expected: ScalarStyle) -> Self {
        match self.node {
            Node::Scalar(scalar) => assert_eq!(
                scalar.style, expected,
                "{}: Expected {:?} scalar, found {:?}",
                self.context, expected, scalar.style
            ),
            _ => panic!(
                "{}: Expected Scalar, found {}",
                self.context,
                self.node.kind()
            ),
        }
        self
    }

    /// Assert the text of a literal or folded block scalar
    pub fn text(self, expected: &str) -> Self {
        match self.node {
            Node::MultilineString(block) | Node::FoldedString(block) => assert_eq!(
                block.text, expected,
                "{}: Block scalar text differs",
                self.context
            ),
            _ => panic!(
                "{}: Expected block scalar, found {}",
                self.context,
                self.node.kind()
            ),
        }
        self
    }

    pub fn chomping(self, expected: Chomping) -> Self {
        match self.node {
            Node::MultilineString(block) | Node::FoldedString(block) => assert_eq!(
                block.chomping, expected,
                "{}: Expected {:?} chomping",
                self.context, expected
            ),
            _ => panic!(
                "{}: Expected block scalar, found {}",
                self.context,
                self.node.kind()
            ),
        }
        self
    }

    /// Assert the number of collection children
    pub fn child_count(self, expected: usize) -> Self {
        let children = self.node.children();
        assert_eq!(
            children.len(),
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            children.len(),
            summarize(children)
        );
        self
    }

    /// Assert on a mapping entry by key
    pub fn entry<F>(self, key: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = self.node.get(key).unwrap_or_else(|| {
            panic!(
                "{}: No entry '{}' in {} [{}]",
                self.context,
                key,
                self.node.kind(),
                summarize(self.node.children())
            )
        });
        assertion(NodeAssertion {
            node,
            context: format!("{}.{}", self.context, key),
        });
        self
    }

    /// Assert on a collection child by index
    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = self.node.children();
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds ({} children)",
            self.context,
            index,
            children.len()
        );
        assertion(NodeAssertion {
            node: &children[index],
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert this is an anchor named `name` and continue on the anchored node
    pub fn anchor<F>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        match self.node {
            Node::Anchor(anchor) => {
                assert_eq!(
                    anchor.name, name,
                    "{}: Expected anchor &{}, found &{}",
                    self.context, name, anchor.name
                );
                assertion(NodeAssertion {
                    node: anchor.node.as_ref(),
                    context: format!("{}&{}", self.context, name),
                });
            }
            _ => panic!(
                "{}: Expected Anchor, found {}",
                self.context,
                self.node.kind()
            ),
        }
        self
    }

    /// Assert this is an alias of `name` and continue on the node it resolves to
    pub fn alias<F>(self, name: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        match self.node {
            Node::Alias(alias) => {
                assert_eq!(
                    alias.name, name,
                    "{}: Expected alias *{}, found *{}",
                    self.context, name, alias.name
                );
                assertion(NodeAssertion {
                    node: alias.target.resolve(),
                    context: format!("{}*{}", self.context, name),
                });
            }
            _ => panic!(
                "{}: Expected Alias, found {}",
                self.context,
                self.node.kind()
            ),
        }
        self
    }
}
