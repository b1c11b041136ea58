//! Differential tests against serde_yaml
//!
//! For the subset this crate supports, the JSON view of every document must equal what
//! serde_yaml deserializes from the same source.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::Deserialize;
use serde_json::Value;
use yamlite::parse_str;
use yamlite::yaml::testing::tree_to_json;

fn reference(source: &str) -> Vec<Value> {
    serde_yaml::Deserializer::from_str(source)
        .map(|document| Value::deserialize(document).expect("serde_yaml to accept the source"))
        .collect()
}

fn ours(source: &str) -> Vec<Value> {
    tree_to_json(&parse_str(source).expect("source to parse"))
}

#[rstest]
#[case::flat_mapping("name: demo\nport: 8080\nratio: 0.25\nenabled: true\nmissing: ~\n")]
#[case::nested_mapping("server:\n  host: localhost\n  limits:\n    cpu: 2\n    memory: 512\n")]
#[case::sequence_of_scalars("- 1\n- two\n- false\n- null\n")]
#[case::sequence_under_key("ports:\n  - 80\n  - 443\n")]
#[case::sequence_of_mappings("jobs:\n  - name: build\n    retries: 2\n  - name: test\n    retries: 0\n")]
#[case::nested_sequences("- - a\n  - b\n- - c\n")]
#[case::flow_collections("list: [1, 2, three]\nmap: {a: 1, b: [x, y]}\nempty: []\n")]
#[case::quoted_scalars("single: 'it''s'\ndouble: \"tab\\there\"\nnumber: '42'\n")]
#[case::comments("# leading\na: 1 # trailing\n\n# between\nb: 2\n")]
#[case::empty_values("a:\nb:\n  c:\n")]
#[case::literal_block("text: |\n  line one\n  line two\nafter: 1\n")]
#[case::literal_strip("text: |-\n  kept\n")]
#[case::folded_block("text: >\n  folded\n  together\n\n  new paragraph\n")]
#[case::anchors_and_aliases("base: &b\n  retries: 3\njob: *b\nvalue: &v 7\ncopy: *v\n")]
#[case::redefined_anchor("a: &x 1\nb: *x\nc: &x 2\n")]
#[case::wide_compact_entries("items:\n    - name: a\n      port: 1\n    - name: b\n")]
#[case::negative_and_float("delta: -12\nscale: 1.5e3\n")]
#[case::top_level_scalar("just a string\n")]
fn test_matches_serde_yaml(#[case] source: &str) {
    assert_eq!(ours(source), reference(source));
}

#[test]
fn test_multi_document_stream_matches_serde_yaml() {
    let source = "---\na: 1\n---\n- x\n- y\n---\nplain\n";
    let expected = reference(source);
    assert_eq!(expected.len(), 3);
    assert_eq!(ours(source), expected);
}
