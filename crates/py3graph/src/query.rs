//! Graph queries: what to show, and why a package is pulled in.
//!
//! [`QueryEngine`] owns the graph being queried so that the extras toggle can
//! prune it in place before any other query runs. Names given by the user
//! that the graph does not know are never errors; they are collected as
//! [`Diagnostic`]s and otherwise ignored.

use crate::domain::EXTRA_KEY;
use crate::graph::Graph;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Which part of a query named a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageRole {
    /// A seed package for the reachability filter.
    Seed,
    /// The target of a why-chain.
    Why,
    /// The target of the requiring filter.
    Requiring,
}

impl fmt::Display for PackageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seed => write!(f, "package"),
            Self::Why => write!(f, "--why package"),
            Self::Requiring => write!(f, "--requiring package"),
        }
    }
}

/// A non-fatal problem found while answering a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A package name that is not in the graph.
    UnknownPackage {
        /// The name as given.
        name: String,
        /// Where it was given.
        role: PackageRole,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPackage { name, role } => write!(f, "unknown {role}: {name}"),
        }
    }
}

/// What to select from the graph.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Seed packages; empty means every package that declares a dependency.
    pub packages: Vec<String>,

    /// Keep edges introduced by extra groups.
    pub include_extras: bool,

    /// Highlight the packages that pull in this one.
    pub why: Option<String>,

    /// Only show the part of the graph that leads to this package.
    pub requiring: Option<String>,
}

/// The packages and edges that transitively pull in a target.
///
/// Edges are stored in the original dependent -> dependency direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhyChain {
    /// The package being explained.
    pub target: String,
    /// The target and every package that depends on it.
    pub nodes: BTreeSet<String>,
    /// The edges walked to find them.
    pub edges: BTreeSet<(String, String)>,
}

impl WhyChain {
    /// Whether `name` is part of the chain.
    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    /// Whether the edge `src -> dst` is part of the chain.
    pub fn contains_edge(&self, src: &str, dst: &str) -> bool {
        self.edges.contains(&(src.to_string(), dst.to_string()))
    }
}

/// Outcome of [`QueryEngine::run`].
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The graph after extras pruning.
    pub graph: Graph,
    /// Names to render.
    pub nodes: BTreeSet<String>,
    /// Highlight set for `--why`, if its target was known.
    pub why: Option<WhyChain>,
    /// Unknown names and similar non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
}

/// Graph-level queries layered on [`Graph`].
#[derive(Debug, Clone)]
pub struct QueryEngine {
    graph: Graph,
}

impl QueryEngine {
    /// Query `graph`.
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// The graph being queried.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Drop every edge introduced by an extra group, and any ghost left dangling.
    pub fn exclude_extras(&mut self) {
        let before = self.graph.edge_count();
        self.graph.remove_edges_with_attr(EXTRA_KEY);
        debug!(
            removed = before - self.graph.edge_count(),
            "excluded extras edges"
        );
    }

    /// Packages that declare at least one dependency, sorted.
    pub fn default_seeds(&self) -> Vec<String> {
        self.graph
            .nodes()
            .into_iter()
            .filter(|name| !self.graph.edges_from(name).is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Everything reachable from `seeds`, or from [`default_seeds`](Self::default_seeds)
    /// when `seeds` is empty.
    ///
    /// Unknown seeds are reported and contribute nothing.
    pub fn reachable(&self, seeds: &[String]) -> (BTreeSet<String>, Vec<Diagnostic>) {
        if seeds.is_empty() {
            return (self.graph.transitive_closure(self.default_seeds()), Vec::new());
        }
        let mut diagnostics = Vec::new();
        let known: Vec<&str> = seeds
            .iter()
            .filter(|name| {
                let known = self.graph.contains(name);
                if !known {
                    diagnostics.push(unknown(name, PackageRole::Seed));
                }
                known
            })
            .map(String::as_str)
            .collect();
        (self.graph.transitive_closure(known), diagnostics)
    }

    /// The packages that transitively depend on `target`, with the edges walked.
    ///
    /// Returns `None` if `target` is not in the graph.
    pub fn why(&self, target: &str) -> Option<WhyChain> {
        if !self.graph.contains(target) {
            return None;
        }
        let reversed = self.graph.transpose();
        let nodes = reversed.traverse(target).map(str::to_string).collect();
        let edges = reversed
            .traverse_edges(target)
            .map(|(dependency, dependent)| (dependent.to_string(), dependency.to_string()))
            .collect();
        Some(WhyChain {
            target: target.to_string(),
            nodes,
            edges,
        })
    }

    /// Restrict `closure` to the packages that lead to `target`.
    ///
    /// Returns `None` if `target` is not in the graph.
    pub fn requiring(&self, closure: &BTreeSet<String>, target: &str) -> Option<BTreeSet<String>> {
        let ancestors = self.why(target)?.nodes;
        Some(closure.intersection(&ancestors).cloned().collect())
    }

    /// Answer a complete [`Query`], consuming the engine.
    pub fn run(mut self, query: &Query) -> QueryResult {
        if !query.include_extras {
            self.exclude_extras();
        }

        let (mut nodes, mut diagnostics) = self.reachable(&query.packages);

        if let Some(target) = &query.requiring {
            match self.requiring(&nodes, target) {
                Some(filtered) => nodes = filtered,
                None => diagnostics.push(unknown(target, PackageRole::Requiring)),
            }
        }

        let why = query.why.as_deref().and_then(|target| {
            let chain = self.why(target);
            if chain.is_none() {
                diagnostics.push(unknown(target, PackageRole::Why));
            }
            chain
        });

        for diagnostic in &diagnostics {
            debug!(%diagnostic, "query diagnostic");
        }
        debug!(
            nodes = nodes.len(),
            highlighted = why.as_ref().map_or(0, |chain| chain.nodes.len()),
            "query complete"
        );

        QueryResult {
            graph: self.graph,
            nodes,
            why,
            diagnostics,
        }
    }
}

fn unknown(name: &str, role: PackageRole) -> Diagnostic {
    Diagnostic::UnknownPackage {
        name: name.to_string(),
        role,
    }
}
