//! Graphviz output.
//!
//! [`DotWriter`] is a low-level emitter for the DOT language that tracks
//! which phase of the document it is in and escapes every name and string
//! value. [`style`] decides what a [`QueryResult`](crate::query::QueryResult)
//! looks like and drives a `DotWriter` to produce the whole document.

pub mod style;

pub use style::{blockers_by_package, render, Blockers, RenderOptions};

use crate::domain::{AttrValue, Attributes};
use crate::error::RenderError;
use std::fmt;
use std::io::Write;

/// Where a [`DotWriter`] is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing written yet.
    NotStarted,
    /// Header written; statements may follow.
    Started,
    /// Closing brace written.
    Ended,
}

/// Target of a default-attribute statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defaults {
    /// `graph[...]`
    Graph,
    /// `node[...]`
    Node,
    /// `edge[...]`
    Edge,
}

impl fmt::Display for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph => write!(f, "graph"),
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// Sequential DOT emitter.
///
/// ```
/// use py3graph::domain::Attributes;
/// use py3graph::render::DotWriter;
///
/// let mut dot = DotWriter::new(Vec::new());
/// dot.start("deps", true).unwrap();
/// dot.emit_edge("a", "b", &Attributes::new()).unwrap();
/// dot.end().unwrap();
/// let text = String::from_utf8(dot.into_inner()).unwrap();
/// assert!(text.contains("\"a\" -> \"b\";"));
/// ```
#[derive(Debug)]
pub struct DotWriter<W: Write> {
    out: W,
    phase: Phase,
    edge_op: &'static str,
}

impl<W: Write> DotWriter<W> {
    /// Wrap a sink.
    pub fn new(out: W) -> Self {
        Self {
            out,
            phase: Phase::NotStarted,
            edge_op: "->",
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Write the header. `directed` selects `digraph`/`->` over `graph`/`--`.
    ///
    /// # Errors
    ///
    /// [`RenderError::AlreadyStarted`] if called twice, or the sink's error.
    pub fn start(&mut self, title: &str, directed: bool) -> Result<(), RenderError> {
        if self.phase != Phase::NotStarted {
            return Err(RenderError::AlreadyStarted);
        }
        let kind = if directed { "digraph" } else { "graph" };
        self.edge_op = if directed { "->" } else { "--" };
        writeln!(self.out, "strict {kind} {} {{", quote(title))?;
        self.phase = Phase::Started;
        Ok(())
    }

    /// Write a default-attribute statement; nothing is written for empty `attrs`.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotStarted`] / [`RenderError::Ended`] outside the body.
    pub fn declare_defaults(&mut self, target: Defaults, attrs: &Attributes) -> Result<(), RenderError> {
        self.ensure_started()?;
        if attrs.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "  {target}{};", format_attrs(attrs))?;
        Ok(())
    }

    /// Write a node statement.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotStarted`] / [`RenderError::Ended`] outside the body.
    pub fn emit_node(&mut self, name: &str, attrs: &Attributes) -> Result<(), RenderError> {
        self.ensure_started()?;
        writeln!(self.out, "  {}{};", quote(name), format_attrs(attrs))?;
        Ok(())
    }

    /// Write an edge statement.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotStarted`] / [`RenderError::Ended`] outside the body.
    pub fn emit_edge(&mut self, src: &str, dst: &str, attrs: &Attributes) -> Result<(), RenderError> {
        self.ensure_started()?;
        writeln!(
            self.out,
            "  {} {} {}{};",
            quote(src),
            self.edge_op,
            quote(dst),
            format_attrs(attrs)
        )?;
        Ok(())
    }

    /// Write the closing brace.
    ///
    /// # Errors
    ///
    /// [`RenderError::NotStarted`] / [`RenderError::Ended`] outside the body.
    pub fn end(&mut self) -> Result<(), RenderError> {
        self.ensure_started()?;
        writeln!(self.out, "}}")?;
        self.out.flush()?;
        self.phase = Phase::Ended;
        Ok(())
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn ensure_started(&self) -> Result<(), RenderError> {
        match self.phase {
            Phase::NotStarted => Err(RenderError::NotStarted),
            Phase::Started => Ok(()),
            Phase::Ended => Err(RenderError::Ended),
        }
    }
}

/// Escape a string for use inside a double-quoted DOT ID.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\0' => escaped.push_str("\\0"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escape and double-quote a string.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

fn format_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Str(s) => quote(s),
        other => other.to_string(),
    }
}

/// `[k1=v1, k2=v2]` in key order, or nothing for empty attributes.
fn format_attrs(attrs: &Attributes) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = attrs
        .iter()
        .map(|(key, value)| format!("{key}={}", format_value(value)))
        .collect();
    format!("[{}]", pairs.join(", "))
}
