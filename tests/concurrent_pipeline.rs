//! The task-based pipeline agrees with the synchronous one, including on errors.

use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Cursor;
use yamlite::yaml::pipeline::concurrent::{parse_stream, spawn_line_feeder, spawn_line_reader};
use yamlite::{parse_str, parse_with_config, ErrorKind, ParserConfig};

fn owned(source: &str) -> Vec<String> {
    source.lines().map(str::to_string).collect()
}

/// More lines than fit in one channel's buffer.
fn long_source() -> String {
    let mut source = String::from("items:\n");
    for index in 0..500 {
        source.push_str(&format!("  - name: item{}\n    weight: {}\n", index, index % 7));
    }
    source.push_str("---\ntrailer: [done]\n");
    source
}

#[rstest]
#[case::mapping("server:\n  host: localhost\n  port: 8080\n")]
#[case::documents("---\na: &x 1\nb: *x\n---\n- one\n- two\n...\n")]
#[case::block_scalar("text: >\n  folded\n  lines\nnext: |+\n  kept\n\n")]
#[case::multi_line_flow("list: [1,\n  2,\n  3]\nafter: true\n")]
#[case::bad_indent("a:\n  b: 1\n   c: 2\n")]
#[case::unknown_alias("a: *missing\n")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_result_as_sync(#[case] source: &str) {
    let concurrent = parse_stream(spawn_line_feeder(owned(source)), ParserConfig::default()).await;
    assert_eq!(concurrent, parse_str(source));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_long_stream_through_bounded_channels() {
    let source = long_source();
    let tree = parse_stream(spawn_line_reader(Cursor::new(source.clone())), ParserConfig::default())
        .await
        .unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.documents[0].get("items").map(|n| n.children().len()), Some(500));
    assert_eq!(tree, parse_str(&source).unwrap());
}

#[tokio::test]
async fn test_config_reaches_the_builder() {
    let source = "a:\n  b:\n    c:\n      d: 1\n";
    let config = ParserConfig::with_max_nesting_depth(2);
    let err = parse_stream(spawn_line_feeder(owned(source)), config)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NestingTooDeep);
    assert_eq!(Err(err), parse_with_config(source.lines(), &config));
}
