//! Styling policy for rendered dependency graphs.
//!
//! Nodes are colored by Python 3 support: green when supported, red when
//! known not to be, neutral grey when unknown. Edges to a package's blockers
//! are drawn in a warning color, extras edges are dotted (and labelled with
//! the extra name when nodes are big enough to carry labels). Members of a
//! why-chain override all of that with the highlight color.

use super::{Defaults, DotWriter};
use crate::domain::{AttrValue, Attributes, EdgeAttrs, NodeAttrs, PackageRecord};
use crate::error::Result;
use crate::query::QueryResult;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use tracing::debug;

const NEUTRAL_COLOR: &str = "#dddddd";
const NEUTRAL_FILL: &str = "#e8e8e880";
const NEUTRAL_EDGE: &str = "#cccccc";
const SUPPORTS_COLOR: &str = "#ccffcc";
const SUPPORTS_FILL: &str = "#ddffdd80";
const UNSUPPORTED_COLOR: &str = "#ffcccc";
const UNSUPPORTED_FILL: &str = "#ffdddd80";
const HIGHLIGHT_COLOR: &str = "#ff9933";
const HIGHLIGHT_FILL: &str = "#ffcc9980";
const BLOCKER_EDGE: &str = "#ee7777";

/// Per-package blockers, as computed by the blocker annotation pass.
pub type Blockers = BTreeMap<String, BTreeSet<String>>;

/// Collect `blockers` and `blockers_extras` of every record.
///
/// Keys are trimmed the same way the graph builder trims package names.
pub fn blockers_by_package(records: &[PackageRecord]) -> Blockers {
    records
        .iter()
        .filter(|record| !record.blockers.is_empty() || !record.blockers_extras.is_empty())
        .map(|record| {
            let blockers = record
                .blockers
                .iter()
                .chain(&record.blockers_extras)
                .cloned()
                .collect();
            (record.name.trim().to_string(), blockers)
        })
        .collect()
}

/// Document-level rendering choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Graph title.
    pub title: String,
    /// Graphviz layout engine (`dot`, `neato`, ...).
    pub layout: String,
    /// Labelled boxes instead of unlabelled points.
    pub big_nodes: bool,
    /// `digraph` rather than `graph`.
    pub directed: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "all deps".to_string(),
            layout: "neato".to_string(),
            big_nodes: false,
            directed: true,
        }
    }
}

/// Render `result` as a complete DOT document into `out`, returning the sink.
///
/// # Errors
///
/// Propagates emitter errors, which only arise from the sink.
pub fn render<W: Write>(
    out: W,
    result: &QueryResult,
    blockers: &Blockers,
    options: &RenderOptions,
) -> Result<W> {
    let mut dot = DotWriter::new(out);
    dot.start(&options.title, options.directed)?;

    dot.declare_defaults(
        Defaults::Graph,
        &attrs([
            ("layout", options.layout.as_str().into()),
            ("outputorder", "edgesfirst".into()),
        ]),
    )?;
    if options.big_nodes {
        dot.declare_defaults(
            Defaults::Node,
            &attrs([("shape", "box".into()), ("style", "filled".into())]),
        )?;
    } else {
        dot.declare_defaults(
            Defaults::Node,
            &attrs([
                ("label", "".into()),
                ("shape", "point".into()),
                ("width", 0.1.into()),
                ("height", 0.1.into()),
            ]),
        )?;
        dot.declare_defaults(
            Defaults::Edge,
            &attrs([("arrowhead", "open".into()), ("arrowsize", 0.3.into())]),
        )?;
    }
    dot.declare_defaults(
        Defaults::Node,
        &attrs([("color", NEUTRAL_COLOR.into()), ("fillcolor", NEUTRAL_FILL.into())]),
    )?;
    dot.declare_defaults(Defaults::Edge, &attrs([("color", NEUTRAL_EDGE.into())]))?;

    let why = result.why.as_ref();
    let mut edge_count = 0;
    for name in &result.nodes {
        let highlighted = why.is_some_and(|chain| chain.contains_node(name));
        dot.emit_node(name, &node_style(result.graph.node_attrs(name), highlighted))?;
    }
    for src in &result.nodes {
        let src_blockers = blockers.get(src);
        for dst in result.graph.edges_from(src) {
            if !result.nodes.contains(dst) {
                continue;
            }
            let edge_attrs = result.graph.edge_attrs(src, dst)?;
            let style = EdgeStyle {
                is_blocker: src_blockers.is_some_and(|b| b.contains(dst)),
                on_why_chain: why.is_some_and(|chain| chain.contains_edge(src, dst)),
                big_nodes: options.big_nodes,
            };
            dot.emit_edge(src, dst, &style.apply(edge_attrs))?;
            edge_count += 1;
        }
    }
    dot.end()?;

    debug!(nodes = result.nodes.len(), edges = edge_count, "rendered graph");
    Ok(dot.into_inner())
}

fn node_style(attrs: Option<&NodeAttrs>, highlighted: bool) -> Attributes {
    let mut style = Attributes::new();
    match attrs.and_then(|a| a.supports_py3) {
        Some(true) => set_colors(&mut style, SUPPORTS_COLOR, SUPPORTS_FILL),
        Some(false) => set_colors(&mut style, UNSUPPORTED_COLOR, UNSUPPORTED_FILL),
        None => {}
    }
    if let Some(attrs) = attrs {
        style.extend(attrs.style.clone());
    }
    if highlighted {
        set_colors(&mut style, HIGHLIGHT_COLOR, HIGHLIGHT_FILL);
    }
    style
}

struct EdgeStyle {
    is_blocker: bool,
    on_why_chain: bool,
    big_nodes: bool,
}

impl EdgeStyle {
    fn apply(&self, edge: &EdgeAttrs) -> Attributes {
        let mut style = Attributes::new();
        if self.is_blocker {
            style.insert("color".to_string(), BLOCKER_EDGE.into());
        }
        if let Some(extra) = &edge.extra {
            style.insert("style".to_string(), "dotted".into());
            if self.big_nodes {
                style.insert("label".to_string(), extra.as_str().into());
            }
        }
        style.extend(edge.style.clone());
        if self.on_why_chain {
            style.insert("color".to_string(), HIGHLIGHT_COLOR.into());
            style.insert("penwidth".to_string(), AttrValue::Int(2));
        }
        style
    }
}

fn set_colors(style: &mut Attributes, color: &str, fill: &str) {
    style.insert("color".to_string(), color.into());
    style.insert("fillcolor".to_string(), fill.into());
}

fn attrs<const N: usize>(pairs: [(&str, AttrValue); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
