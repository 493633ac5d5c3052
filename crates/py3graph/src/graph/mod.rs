//! Dependency graph store using petgraph.
//!
//! # Graph Representation
//!
//! Edges point from **dependent to dependency**: `a -> b` means package `a`
//! requires package `b`. At most one edge exists per `(src, dst)` pair;
//! adding the same pair again merges attributes into the existing edge.
//!
//! Every name that appears anywhere in the graph has exactly one petgraph
//! node. A node is *explicit* when it was registered with [`Graph::add_node`]
//! and carries [`NodeAttrs`]; otherwise it is a *ghost* that exists only
//! because an edge refers to it. Ghosts without any remaining edge are
//! dropped, so the ghost set is always "edge endpoints that are not explicit
//! nodes".
//!
//! A `StableDiGraph` is used so that dropping ghosts and edges never
//! invalidates the indices held in the name index.
//!
//! # Ordering
//!
//! Every listing (`nodes`, `ghost_nodes`, `edges_from`, `edges`) is sorted by
//! name so traversal order and rendered output are reproducible.

mod traverse;

pub use traverse::{Traverse, TraverseEdges};

use crate::domain::{EdgeAttrs, NodeAttrs};
use crate::error::{Error, Result};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Payload of a petgraph node.
#[derive(Debug, Clone)]
struct GraphNode {
    name: String,
    /// `None` for ghost nodes.
    attrs: Option<NodeAttrs>,
}

/// Adjacency-list store of named nodes and attributed, directed edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes contain names and optional attributes, edges contain `EdgeAttrs`.
    graph: StableDiGraph<GraphNode, EdgeAttrs>,

    /// Mapping from node name to graph index, for explicit and ghost nodes alike.
    index: BTreeMap<String, NodeIndex>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` as an explicit node, merging into existing attributes.
    ///
    /// A ghost of the same name is promoted to an explicit node.
    pub fn add_node(&mut self, name: &str, attrs: NodeAttrs) {
        let idx = self.ensure_node(name);
        let node = &mut self.graph[idx];
        match &mut node.attrs {
            Some(existing) => existing.merge(attrs),
            None => node.attrs = Some(attrs),
        }
    }

    /// Add the edge `src -> dst`, merging into an existing edge's attributes.
    ///
    /// Endpoints that are not yet known become ghost nodes.
    pub fn add_edge(&mut self, src: &str, dst: &str, attrs: EdgeAttrs) {
        let from = self.ensure_node(src);
        let to = self.ensure_node(dst);
        match self.graph.find_edge(from, to) {
            Some(edge) => self.graph[edge].merge(attrs),
            None => {
                trace!(src, dst, extra = ?attrs.extra, "adding edge");
                self.graph.add_edge(from, to, attrs);
            }
        }
    }

    /// Explicitly registered node names, sorted.
    pub fn nodes(&self) -> Vec<&str> {
        self.names_where(|node| node.attrs.is_some())
    }

    /// Names referenced by edges but never registered, sorted.
    pub fn ghost_nodes(&self) -> Vec<&str> {
        self.names_where(|node| node.attrs.is_none())
    }

    /// Whether `name` is an explicit node or a ghost.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Whether `name` is a ghost node.
    pub fn is_ghost(&self, name: &str) -> bool {
        self.index
            .get(name)
            .is_some_and(|&idx| self.graph[idx].attrs.is_none())
    }

    /// Attributes of an explicit node; `None` for ghosts and unknown names.
    pub fn node_attrs(&self, name: &str) -> Option<&NodeAttrs> {
        let &idx = self.index.get(name)?;
        self.graph[idx].attrs.as_ref()
    }

    /// Number of explicit and ghost nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Destinations of the edges leaving `src`, sorted. Empty for unknown names.
    pub fn edges_from(&self, src: &str) -> Vec<&str> {
        self.neighbors(src, Direction::Outgoing)
    }

    /// Sources of the edges entering `dst`, sorted. Empty for unknown names.
    pub fn edges_to(&self, dst: &str) -> Vec<&str> {
        self.neighbors(dst, Direction::Incoming)
    }

    /// Whether the edge `src -> dst` exists.
    pub fn has_edge(&self, src: &str, dst: &str) -> bool {
        self.find_edge(src, dst).is_some()
    }

    /// Attributes of the edge `src -> dst`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotFound`] if there is no such edge.
    pub fn edge_attrs(&self, src: &str, dst: &str) -> Result<&EdgeAttrs> {
        self.find_edge(src, dst)
            .map(|edge| &self.graph[edge])
            .ok_or_else(|| Error::EdgeNotFound {
                src: src.to_string(),
                dst: dst.to_string(),
            })
    }

    /// All edges as `(src, dst, attrs)`, sorted by `(src, dst)`.
    pub fn edges(&self) -> Vec<(&str, &str, &EdgeAttrs)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].name.as_str(),
                    self.graph[edge.target()].name.as_str(),
                    edge.weight(),
                )
            })
            .collect();
        edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        edges
    }

    /// A copy of this graph with every edge reversed.
    ///
    /// Node and edge attributes are carried over unchanged.
    pub fn transpose(&self) -> Graph {
        let mut transposed = Graph::new();
        for (name, &idx) in &self.index {
            if let Some(attrs) = &self.graph[idx].attrs {
                transposed.add_node(name, attrs.clone());
            }
        }
        for (src, dst, attrs) in self.edges() {
            transposed.add_edge(dst, src, attrs.clone());
        }
        transposed
    }

    /// Remove every edge whose destination is `dst`.
    ///
    /// `dst` and any ghost source left without edges disappear.
    pub fn remove_edges_to(&mut self, dst: &str) {
        let Some(&to) = self.index.get(dst) else {
            return;
        };
        let (doomed, mut touched): (Vec<_>, Vec<_>) = self
            .graph
            .edges_directed(to, Direction::Incoming)
            .map(|edge| (edge.id(), edge.source()))
            .unzip();
        trace!(dst, count = doomed.len(), "removing edges to node");
        for edge in doomed {
            self.graph.remove_edge(edge);
        }
        touched.push(to);
        touched.sort_unstable();
        touched.dedup();
        for idx in touched {
            self.drop_if_unreferenced_ghost(idx);
        }
    }

    /// Remove every edge whose attribute `key` is truthy.
    ///
    /// Ghosts that are no longer referenced by any edge disappear.
    pub fn remove_edges_with_attr(&mut self, key: &str) {
        let doomed: Vec<_> = self
            .graph
            .edge_indices()
            .filter(|&edge| self.graph[edge].is_truthy(key))
            .collect();
        trace!(key, count = doomed.len(), "removing edges by attribute");
        for edge in doomed {
            self.graph.remove_edge(edge);
        }
        let ghosts: Vec<_> = self
            .index
            .values()
            .copied()
            .filter(|&idx| self.graph[idx].attrs.is_none())
            .collect();
        for idx in ghosts {
            self.drop_if_unreferenced_ghost(idx);
        }
    }

    /// Lazy pre-order depth-first walk of the names reachable from `start`.
    ///
    /// `start` is always yielded first, even if the graph does not know it.
    pub fn traverse<'a>(&'a self, start: &'a str) -> Traverse<'a> {
        Traverse::new(self, start)
    }

    /// Like [`traverse`](Self::traverse), yielding the `(src, dst)` edges walked.
    pub fn traverse_edges<'a>(&'a self, start: &'a str) -> TraverseEdges<'a> {
        TraverseEdges::new(self, start)
    }

    /// All names reachable from any of `seeds`, seeds included.
    pub fn transitive_closure<I, S>(&self, seeds: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut closure = BTreeSet::new();
        let mut stack = Vec::new();
        for seed in seeds {
            let seed = seed.as_ref();
            if closure.insert(seed.to_string()) {
                stack.push(seed.to_string());
            }
        }
        while let Some(name) = stack.pop() {
            for dst in self.edges_from(&name) {
                if !closure.contains(dst) {
                    closure.insert(dst.to_string());
                    stack.push(dst.to_string());
                }
            }
        }
        closure
    }

    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            name: name.to_string(),
            attrs: None,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn find_edge(&self, src: &str, dst: &str) -> Option<petgraph::stable_graph::EdgeIndex> {
        let &from = self.index.get(src)?;
        let &to = self.index.get(dst)?;
        self.graph.find_edge(from, to)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn names_where(&self, keep: impl Fn(&GraphNode) -> bool) -> Vec<&str> {
        self.index
            .iter()
            .filter(|&(_, &idx)| keep(&self.graph[idx]))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    fn drop_if_unreferenced_ghost(&mut self, idx: NodeIndex) {
        let node = &self.graph[idx];
        if node.attrs.is_some() || self.graph.neighbors_undirected(idx).next().is_some() {
            return;
        }
        trace!(name = %node.name, "dropping unreferenced ghost");
        self.index.remove(&node.name);
        self.graph.remove_node(idx);
    }
}
