//! Depth-first traversal iterators.
//!
//! Traversal keeps an explicit stack of frames instead of recursing, so a
//! deep dependency chain cannot overflow the call stack. Each frame holds the
//! sorted children of one node and a cursor into them, which reproduces the
//! visiting order of a recursive pre-order walk exactly.

use super::Graph;
use std::collections::HashSet;
use std::vec;

struct Frame<'a> {
    node: &'a str,
    children: vec::IntoIter<&'a str>,
}

/// Shared walk state: yields `(parent, node)` for every newly visited node.
struct Walk<'a> {
    graph: &'a Graph,
    start: Option<&'a str>,
    stack: Vec<Frame<'a>>,
    visited: HashSet<&'a str>,
}

impl<'a> Walk<'a> {
    fn new(graph: &'a Graph, start: &'a str) -> Self {
        Self {
            graph,
            start: Some(start),
            stack: Vec::new(),
            visited: HashSet::new(),
        }
    }

    fn enter(&mut self, node: &'a str) {
        self.visited.insert(node);
        self.stack.push(Frame {
            node,
            children: self.graph.edges_from(node).into_iter(),
        });
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (Option<&'a str>, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.start.take() {
            self.enter(start);
            return Some((None, start));
        }
        while let Some(frame) = self.stack.last_mut() {
            match frame.children.next() {
                Some(child) if !self.visited.contains(child) => {
                    let parent = frame.node;
                    self.enter(child);
                    return Some((Some(parent), child));
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// Iterator over the names reachable from a start node, in DFS pre-order.
///
/// Created by [`Graph::traverse`].
pub struct Traverse<'a>(Walk<'a>);

impl<'a> Traverse<'a> {
    pub(super) fn new(graph: &'a Graph, start: &'a str) -> Self {
        Self(Walk::new(graph, start))
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, node)| node)
    }
}

/// Iterator over the `(src, dst)` edges a DFS from a start node descends.
///
/// Created by [`Graph::traverse_edges`]. Only edges that lead to a node not
/// seen before are yielded.
pub struct TraverseEdges<'a>(Walk<'a>);

impl<'a> TraverseEdges<'a> {
    pub(super) fn new(graph: &'a Graph, start: &'a str) -> Self {
        Self(Walk::new(graph, start))
    }
}

impl<'a> Iterator for TraverseEdges<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .by_ref()
            .find_map(|(parent, node)| parent.map(|parent| (parent, node)))
    }
}
