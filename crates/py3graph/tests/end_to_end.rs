//! Library-level scenarios: records in, DOT text out.

use py3graph::blockers;
use py3graph::builder::GraphBuilder;
use py3graph::domain::{AttrValue, EdgeAttrs, PackageRecord};
use py3graph::graph::Graph;
use py3graph::query::{Query, QueryEngine};
use py3graph::render::{DotWriter, RenderOptions, blockers_by_package, render};
use rstest::{fixture, rstest};
use std::collections::BTreeSet;

/// a -> b -> c, with b also requiring d through extra `x`
#[fixture]
fn records() -> Vec<PackageRecord> {
    vec![
        PackageRecord::new("a").requires(["b"]),
        PackageRecord::new("b").requires(["c"]).extra("x", ["d"]),
        PackageRecord::new("c"),
    ]
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// Read back one double-quoted DOT ID starting at the front of `s`.
fn unquote(s: &str) -> Option<(String, &str)> {
    let mut chars = s.strip_prefix('"')?.char_indices();
    let mut name = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((name, &s[i + 2..])),
            '\\' => match chars.next()?.1 {
                'n' => name.push('\n'),
                '0' => name.push('\0'),
                other => name.push(other),
            },
            c => name.push(c),
        }
    }
    None
}

#[rstest]
fn test_build_with_extras(records: Vec<PackageRecord>) {
    let graph = GraphBuilder::new().build(&records).unwrap();

    assert_eq!(graph.edge_attrs("a", "b").unwrap().extra, None);
    assert_eq!(graph.edge_attrs("b", "c").unwrap().extra, None);
    assert_eq!(graph.edge_attrs("b", "d").unwrap().extra.as_deref(), Some("x"));
    assert_eq!(graph.edges().len(), 3);
    assert_eq!(graph.ghost_nodes(), vec!["d"]);
    assert_eq!(graph.transitive_closure(["a"]), set(&["a", "b", "c", "d"]));
}

#[rstest]
fn test_query_without_extras(records: Vec<PackageRecord>) {
    let graph = GraphBuilder::new().build(&records).unwrap();
    let result = QueryEngine::new(graph).run(&Query {
        packages: vec!["a".to_string()],
        ..Query::default()
    });

    assert_eq!(result.nodes, set(&["a", "b", "c"]));
    assert!(!result.graph.contains("d"));
    assert!(result.graph.ghost_nodes().is_empty());
}

#[rstest]
fn test_why_chain(records: Vec<PackageRecord>) {
    let graph = GraphBuilder::new().build(&records).unwrap();
    let chain = QueryEngine::new(graph).why("c").unwrap();

    assert_eq!(chain.nodes, set(&["a", "b", "c"]));
    let expected: BTreeSet<(String, String)> = [("b", "c"), ("a", "b")]
        .into_iter()
        .map(|(src, dst)| (src.to_string(), dst.to_string()))
        .collect();
    assert_eq!(chain.edges, expected);
}

#[test]
fn test_add_edge_twice_unions_attributes() {
    let mut graph = Graph::new();
    graph.add_edge("a", "b", EdgeAttrs::mandatory().with_style("color", "red"));
    graph.add_edge("a", "b", EdgeAttrs::extra("docs").with_style("weight", 2_i64));

    assert_eq!(graph.edge_count(), 1);
    let attrs = graph.edge_attrs("a", "b").unwrap();
    assert_eq!(attrs.extra.as_deref(), Some("docs"));
    assert_eq!(attrs.get("color"), Some(AttrValue::from("red")));
    assert_eq!(attrs.get("weight"), Some(AttrValue::Int(2)));
}

#[test]
fn test_escaped_names_round_trip() {
    let name = "odd \"name\"\\with\nnewline";
    let mut dot = DotWriter::new(Vec::new());
    dot.start("t", true).unwrap();
    dot.emit_edge(name, "plain", &Default::default()).unwrap();
    dot.end().unwrap();
    let text = String::from_utf8(dot.into_inner()).unwrap();

    let statement = text.lines().nth(1).unwrap().trim_start();
    assert_eq!(text.lines().count(), 3);
    let (src, rest) = unquote(statement).unwrap();
    assert_eq!(src, name);
    let (dst, rest) = unquote(rest.trim_start().strip_prefix("->").unwrap().trim_start()).unwrap();
    assert_eq!(dst, "plain");
    assert_eq!(rest, ";");
}

#[rstest]
fn test_annotate_then_render(records: Vec<PackageRecord>) {
    let mut records = records;
    records[0].supports = vec!["2.7".to_string()];
    records[1].supports = vec!["2.7".to_string()];
    records[2].supports = vec!["2.7".to_string(), "3.4".to_string()];
    blockers::annotate(&mut records);
    assert_eq!(records[0].blockers, vec!["b"]);

    let graph = GraphBuilder::new().build(&records).unwrap();
    let result = QueryEngine::new(graph).run(&Query {
        include_extras: true,
        why: Some("c".to_string()),
        ..Query::default()
    });
    let out = render(
        Vec::new(),
        &result,
        &blockers_by_package(&records),
        &RenderOptions::default(),
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("  \"a\" -> \"b\"[color=\"#ff9933\", penwidth=2];\n"));
    assert!(text.contains("  \"b\" -> \"d\"[style=\"dotted\"];\n"));
    assert!(text.contains("  \"d\";\n"));
    assert!(text.contains("  \"c\"[color=\"#ff9933\", fillcolor=\"#ffcc9980\"];\n"));
}
