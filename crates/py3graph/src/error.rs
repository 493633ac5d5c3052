//! Error types for py3graph operations.
//!
//! Only contract violations and data-integrity problems are errors. Unknown
//! package names on the command line are reported as
//! [`Diagnostic`](crate::query::Diagnostic) values instead.

use std::io;
use thiserror::Error;

/// The error type for py3graph operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input could not be parsed or serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A package record has no usable name.
    #[error("package record #{index} has no name")]
    MissingName {
        /// Zero-based position of the record in the input.
        index: usize,
    },

    /// Two package records share a name.
    #[error("duplicate package record: {0}")]
    DuplicatePackage(String),

    /// An edge lookup referred to an edge that does not exist.
    #[error("edge not found: {src} -> {dst}")]
    EdgeNotFound {
        /// Source node name.
        src: String,
        /// Destination node name.
        dst: String,
    },

    /// The graph description emitter was misused or its sink failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors raised by [`DotWriter`](crate::render::DotWriter).
#[derive(Debug, Error)]
pub enum RenderError {
    /// A statement was emitted before `start()`.
    #[error("graph description not started")]
    NotStarted,

    /// `start()` was called twice.
    #[error("graph description already started")]
    AlreadyStarted,

    /// A statement was emitted after `end()`.
    #[error("graph description already ended")]
    Ended,

    /// The underlying writer failed.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// A specialized Result type for py3graph operations.
pub type Result<T> = std::result::Result<T, Error>;
