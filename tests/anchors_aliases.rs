//! Anchors and aliases: registration, resolution, redefinition and scoping.

use pretty_assertions::assert_eq;
use yamlite::yaml::ast::{DocumentLayout, Position};
use yamlite::yaml::testing::assert_ast;
use yamlite::{parse_str, ErrorKind, Node, NodeKind, ScalarValue};

#[test]
fn test_alias_resolves_to_anchored_node() {
    let source = "\
defaults: &base
  retries: 3
  timeout: 30
job: *base
";
    let tree = parse_str(source).unwrap();
    let doc = &tree.documents[0];

    let defaults = doc.get("defaults").unwrap();
    let job = doc.get("job").unwrap();
    assert_eq!(defaults.kind(), NodeKind::Anchor);
    assert_eq!(job.kind(), NodeKind::Alias);

    let anchored = defaults.resolve();
    let aliased = job.resolve();
    assert_eq!(anchored, aliased);
    assert_eq!(aliased.kind(), NodeKind::MappingBlock);
    assert_eq!(
        aliased.get("timeout").and_then(Node::as_scalar),
        Some(&ScalarValue::Integer(30))
    );

    assert_ast(&tree).document(0, |doc| {
        doc.anchor_names(&["base"]).entry("job", |job| {
            job.alias("base", |target| {
                target.kind(NodeKind::MappingBlock).child_count(2);
            });
        });
    });
}

#[test]
fn test_anchored_scalar_keeps_its_key_on_the_anchor() {
    let tree = parse_str("name: &n demo\ncopy: *n\n").unwrap();
    assert_ast(&tree).document(0, |doc| {
        doc.entry("name", |name| {
            name.kind(NodeKind::Anchor).key("name").anchor("n", |inner| {
                inner.no_key().string("demo");
            });
        })
        .entry("copy", |copy| {
            copy.key("copy").at(2, 1).alias("n", |target| {
                target.string("demo");
            });
        });
    });
}

#[test]
fn test_sequence_items_anchor_and_alias() {
    let tree = parse_str("- &first x\n- *first\n- y\n").unwrap();
    assert_ast(&tree).document(0, |doc| {
        doc.layout(DocumentLayout::Sequence)
            .node_count(3)
            .node(0, |n| {
                n.no_key().anchor("first", |inner| {
                    inner.string("x");
                });
            })
            .node(1, |n| {
                n.alias("first", |target| {
                    target.string("x");
                });
            });
    });
}

#[test]
fn test_anchored_flow_collection() {
    let tree = parse_str("ports: &p [80, 443]\nmirror: *p\n").unwrap();
    assert_ast(&tree).document(0, |doc| {
        doc.entry("ports", |ports| {
            ports.anchor("p", |inner| {
                inner.kind(NodeKind::SequenceFlow).child_count(2).item(1, |i| {
                    i.integer(443);
                });
            });
        })
        .entry("mirror", |mirror| {
            mirror.alias("p", |target| {
                target.kind(NodeKind::SequenceFlow);
            });
        });
    });
}

#[test]
fn test_alias_inside_flow_collection() {
    let tree = parse_str("one: &a 1\nboth: [*a, 2]\n").unwrap();
    let doc = &tree.documents[0];
    let both = doc.get("both").unwrap();
    assert_eq!(both.kind(), NodeKind::SequenceFlow);
    let first = &both.children()[0];
    assert_eq!(first.kind(), NodeKind::Alias);
    assert_eq!(
        first.resolve().as_scalar(),
        Some(&ScalarValue::Integer(1))
    );
}

#[test]
fn test_aliases_are_collected_from_subtrees() {
    let tree = parse_str("a: &a 1\nlist:\n  - *a\n  - [*a]\n").unwrap();
    let list = tree.documents[0].get("list").unwrap();
    let names: Vec<&str> = list.aliases().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["a", "a"]);
}

#[test]
fn test_anchors_do_not_cross_documents() {
    let err = parse_str("---\na: &x 1\n---\nb: *x\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownAnchor);
    assert_eq!(err.position(), Position::new(4, 4));
}

#[test]
fn test_alias_before_anchor_is_unknown() {
    let err = parse_str("a: *later\nb: &later 1\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownAnchor);
    assert_eq!(err.position(), Position::new(1, 4));
}

#[test]
fn test_alias_inside_its_own_anchor_is_unknown() {
    // the anchor is registered only once its node is complete
    let err = parse_str("a: &self\n  b: *self\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownAnchor);
    assert_eq!(err.position(), Position::new(2, 6));
}

#[test]
fn test_unknown_alias_in_flow() {
    let err = parse_str("a: [1, *missing]\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownAnchor);
    assert_eq!(err.position(), Position::new(1, 8));
}

#[test]
fn test_anchor_tables_are_per_document() {
    let tree = parse_str("a: &x 1\n---\nb: &y 2\nc: *y\n").unwrap();
    assert_ast(&tree)
        .document_count(2)
        .document(0, |doc| {
            doc.anchor_names(&["x"]);
        })
        .document(1, |doc| {
            doc.anchor_names(&["y"]).entry("c", |c| {
                c.alias("y", |target| {
                    target.integer(2);
                });
            });
        });
}

#[test]
fn test_redefined_anchor_leaves_earlier_aliases_alone() {
    let tree = parse_str("a: &x 1\nb: *x\nc: &x 2\nd: *x\n").unwrap();
    let doc = &tree.documents[0];
    let value = |key: &str| doc.get(key).and_then(|node| node.resolve().as_scalar());

    assert_eq!(value("b"), Some(&ScalarValue::Integer(1)));
    assert_eq!(value("d"), Some(&ScalarValue::Integer(2)));
    assert_eq!(
        doc.anchors.get("x").and_then(|node| node.as_scalar()),
        Some(&ScalarValue::Integer(2))
    );
}

#[test]
fn test_anchor_on_alias_and_rebinding_terminates() {
    let tree = parse_str("a: &x 1\nb: &y *x\nc: &x *y\n").unwrap();
    let doc = &tree.documents[0];

    for node in &doc.nodes {
        assert_eq!(node.resolve().as_scalar(), Some(&ScalarValue::Integer(1)));
    }
    assert_ast(&tree).document(0, |doc| {
        doc.anchor_names(&["x", "y"]).entry("c", |c| {
            c.anchor("x", |inner| {
                inner.alias("y", |target| {
                    target.integer(1);
                });
            });
        });
    });
}
