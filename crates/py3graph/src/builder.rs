//! Building a [`Graph`] from package records.
//!
//! Each record becomes an explicit node carrying its Python 3 support flag.
//! Mandatory requirements become plain edges. Extra requirements become
//! edges tagged with the extra group, unless an edge to the same dependency
//! already exists: mandatory requirements always win, and among extras the
//! alphabetically first group wins.
//!
//! Afterwards every ghost named like `pkg[extra]` gets a plain edge to `pkg`,
//! because depending on a package with an extra implies depending on the
//! package itself.

use crate::domain::{EdgeAttrs, NodeAttrs, PackageRecord};
use crate::error::{Error, Result};
use crate::graph::Graph;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Populates a [`Graph`] from a sequence of [`PackageRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    /// Requirements that never produce an edge (e.g. `setuptools`).
    ignored: BTreeSet<String>,
}

impl GraphBuilder {
    /// A builder that keeps every requirement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip requirements with any of the given names.
    #[must_use]
    pub fn ignoring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether a requirement on `name` is skipped.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    /// Build the graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingName`] for a record with an empty name and
    /// [`Error::DuplicatePackage`] when two records share a name.
    pub fn build(&self, records: &[PackageRecord]) -> Result<Graph> {
        let mut graph = Graph::new();
        let mut seen = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            let name = record.name.trim();
            if name.is_empty() {
                return Err(Error::MissingName { index });
            }
            if !seen.insert(name) {
                return Err(Error::DuplicatePackage(name.to_string()));
            }
            graph.add_node(name, NodeAttrs::with_support(record.supports_py3));

            for dep in record.requires.iter().filter(|dep| !self.is_ignored(dep)) {
                graph.add_edge(name, dep, EdgeAttrs::mandatory());
            }

            // BTreeMap iteration gives the alphabetical group order the tie-break relies on.
            for (group, deps) in &record.requires_extras {
                for dep in deps.iter().filter(|dep| !self.is_ignored(dep)) {
                    if !graph.has_edge(name, dep) {
                        graph.add_edge(name, dep, EdgeAttrs::extra(group));
                    }
                }
            }
        }

        let qualified: Vec<(String, String)> = graph
            .ghost_nodes()
            .into_iter()
            .filter_map(|ghost| {
                split_extra(ghost).map(|(base, _)| (ghost.to_string(), base.to_string()))
            })
            .collect();
        for (ghost, base) in &qualified {
            graph.add_edge(ghost, base, EdgeAttrs::mandatory());
        }

        debug!(
            nodes = graph.nodes().len(),
            ghosts = graph.ghost_nodes().len(),
            edges = graph.edge_count(),
            extra_qualified = qualified.len(),
            "built dependency graph"
        );
        Ok(graph)
    }
}

/// Split `pkg[extra]` into `("pkg", "extra")`.
///
/// Returns `None` for names without a bracketed suffix or with an empty base.
pub fn split_extra(name: &str) -> Option<(&str, &str)> {
    let (base, rest) = name.split_once('[')?;
    let extra = rest.strip_suffix(']')?;
    let base = base.trim();
    if base.is_empty() {
        return None;
    }
    Some((base, extra))
}
