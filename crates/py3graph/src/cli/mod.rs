//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for py3graph using clap's
//! derive API.
//!
//! # Commands
//!
//! - `graph`: Render the dependency graph of package records as Graphviz DOT
//! - `blockers`: Annotate package records with their Python 3 blockers
//! - `requires`: Parse setuptools `requires.txt` files into JSON
//!
//! # Global Flags
//!
//! - `-v`: Increase log verbosity (repeatable)
//! - `--config`: Read defaults from a YAML file
//!
//! # Example
//!
//! ```bash
//! py3graph blockers < deps.json > blockers.json
//! py3graph graph --extras --why zope.interface < blockers.json > graph.dot
//! dot -Tsvg -O graph.dot
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

// Re-export argument structs
pub use args::{BlockersArgs, GraphArgs, RequiresArgs};

// Re-export validators for external use
pub use validators::{validate_layout, validate_package_name};

/// py3graph - dependency graphs for Python 3 porting
///
/// Reads JSON package records, works out which packages block others from
/// claiming Python 3 support, and renders the dependencies as a Graphviz graph.
#[derive(Parser, Debug)]
#[command(name = "py3graph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// YAML configuration file with rendering defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a dependency graph in Graphviz format
    ///
    /// Reads a JSON list of package records and writes a DOT description to
    /// stdout, e.g. `py3graph graph < blockers.json > graph.dot`.
    Graph(GraphArgs),

    /// Determine the Python 3 blockers of each package
    ///
    /// Reads a JSON list of package records with `supports` version lists and
    /// writes them back annotated with `supports_py3`, blockers and blocks.
    Blockers(BlockersArgs),

    /// Extract requirements from setuptools requires.txt files
    Requires(RequiresArgs),
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter implied by the `-v` count.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Load the configuration named by `--config`, or the defaults.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Ok(Config::load(path)?),
            None => Ok(Config::default()),
        }
    }

    /// Execute the parsed command.
    pub fn execute(&self) -> Result<()> {
        let config = self.load_config()?;
        tracing::debug!(?config, "loaded configuration");

        match &self.command {
            Commands::Graph(args) => execute::execute_graph(args, &config),
            Commands::Blockers(args) => execute::execute_blockers(args),
            Commands::Requires(args) => execute::execute_requires(args),
        }
    }
}
