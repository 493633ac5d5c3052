//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use super::validators::{validate_layout, validate_package_name};

/// Arguments for the `graph` command
#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    /// Include these packages and their dependencies only
    ///
    /// Default: every package that declares at least one dependency.
    #[arg(value_name = "PACKAGE", value_parser = validate_package_name)]
    pub packages: Vec<String>,

    /// Read package records from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Include requirements for setuptools extras
    #[arg(short, long, visible_alias = "include-extras")]
    pub extras: bool,

    /// Use large labelled nodes (works better with --layout=dot)
    #[arg(short, long)]
    pub big_nodes: bool,

    /// Use large nodes automatically when at most this many nodes are shown (0 disables)
    #[arg(long, value_name = "N")]
    pub big_node_threshold: Option<usize>,

    /// Graph layout engine (e.g. dot, neato, twopi, circo, fdp)
    #[arg(short, long, value_name = "ENGINE", value_parser = validate_layout)]
    pub layout: Option<String>,

    /// Highlight the packages that cause this package to be required
    #[arg(short, long, value_name = "PACKAGE", value_parser = validate_package_name)]
    pub why: Option<String>,

    /// Only show packages that lead to this package
    #[arg(short, long, value_name = "PACKAGE", value_parser = validate_package_name)]
    pub requiring: Option<String>,

    /// Graph title (default: derived from the package names)
    #[arg(long)]
    pub title: Option<String>,

    /// Emit an undirected graph
    #[arg(long)]
    pub undirected: bool,
}

/// Arguments for the `blockers` command
#[derive(Parser, Debug, Clone)]
pub struct BlockersArgs {
    /// Read package records from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// Arguments for the `requires` command
#[derive(Parser, Debug, Clone)]
pub struct RequiresArgs {
    /// requires.txt files to parse
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}
