//! py3graph - Python 3 porting dependency graphs.
//!
//! This crate reads package records (name, requirements, extras and the
//! Python versions each package declares), works out which requirements
//! block a package from supporting Python 3, and renders the dependency
//! graph in Graphviz DOT format.
//!
//! The pipeline is:
//!
//! 1. [`blockers::annotate`] fills in `supports_py3` and the blocker lists.
//! 2. [`builder::GraphBuilder`] turns records into a [`graph::Graph`].
//! 3. [`query::QueryEngine`] selects the nodes to show and the `--why` chain.
//! 4. [`render::render`] writes the selection through a [`render::DotWriter`].

#![forbid(unsafe_code)]

pub mod blockers;
pub mod builder;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod query;
pub mod render;
pub mod requirements;

pub use error::{Error, Result};
