//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Each command
//! reads its input, runs the library pipeline and writes the result to stdout.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::Path;
use tracing::{debug, info};

use super::args::{BlockersArgs, GraphArgs, RequiresArgs};
use crate::blockers;
use crate::builder::GraphBuilder;
use crate::config::Config;
use crate::domain::PackageRecord;
use crate::query::{Query, QueryEngine};
use crate::render::{blockers_by_package, render};
use crate::requirements::{Requirements, parse_requires_txt};

/// Execute the graph command
pub fn execute_graph(args: &GraphArgs, config: &Config) -> Result<()> {
    let records = read_records(args.input.as_deref())?;

    let mut config = config.clone();
    if let Some(layout) = &args.layout {
        config.layout = layout.clone();
    }
    if let Some(threshold) = args.big_node_threshold {
        config.big_node_threshold = threshold;
    }

    let graph = GraphBuilder::new()
        .ignoring(config.ignored_requirements.iter().cloned())
        .build(&records)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built dependency graph"
    );

    let query = Query {
        packages: args.packages.clone(),
        include_extras: args.extras,
        why: args.why.clone(),
        requiring: args.requiring.clone(),
    };
    let result = QueryEngine::new(graph).run(&query);

    for diagnostic in &result.diagnostics {
        eprintln!("{}: {diagnostic}", "warning".yellow().bold());
    }

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| config.title_for(&args.packages));
    let mut options = config.render_options(title, result.nodes.len(), args.big_nodes);
    options.directed = !args.undirected;
    debug!(?options, "rendering");

    let stdout = io::stdout();
    let out = render(
        BufWriter::new(stdout.lock()),
        &result,
        &blockers_by_package(&records),
        &options,
    )?;
    out.into_inner()
        .map_err(|e| e.into_error())
        .context("failed to flush graph output")?;

    Ok(())
}

/// Execute the blockers command
pub fn execute_blockers(args: &BlockersArgs) -> Result<()> {
    let mut records = read_records(args.input.as_deref())?;
    blockers::fill_supports(&mut records);
    blockers::annotate(&mut records);

    let blocked = records
        .iter()
        .filter(|record| !record.all_blockers.is_empty())
        .count();
    info!(packages = records.len(), blocked, "annotated blockers");

    // Round-trip through Value so object keys come out sorted.
    let value = serde_json::to_value(&records)?;
    write_json(&value)
}

/// Execute the requires command
pub fn execute_requires(args: &RequiresArgs) -> Result<()> {
    let mut parsed: BTreeMap<String, Requirements> = BTreeMap::new();
    for path in &args.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parsed.insert(path.display().to_string(), parse_requires_txt(&text));
    }
    write_json(&parsed)
}

/// Read a JSON list of package records from `input`, or from stdin.
fn read_records(input: Option<&Path>) -> Result<Vec<PackageRecord>> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                bail!("refusing to read package records from a terminal; pipe JSON into stdin or pass --input");
            }
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };

    let records: Vec<PackageRecord> =
        serde_json::from_str(&text).context("input is not a JSON list of package records")?;
    debug!(count = records.len(), "read package records");
    Ok(records)
}

fn write_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
