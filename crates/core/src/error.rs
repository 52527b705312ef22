//! Error types shared by every datastack crate.
//!
//! One `thiserror`-derived enum covers the error kinds named in the
//! datastack's failure semantics: malformed store URIs, writes rejected
//! by read-only layers, missing keys, layer push conflicts, fixer
//! failures, validator rejections, use-after-close, and the underlying
//! I/O failures of a physical store.

use std::fmt;
use thiserror::Error;

/// Result type alias used throughout the datastack crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the content datastack.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed store URI, unknown scheme, or missing required option.
    #[error("config error: {0}")]
    Config(String),

    /// A write was attempted against a layer or store that is read-only.
    #[error("store is read-only")]
    ReadOnly,

    /// The requested sub or key does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A layer push conflicted with a lower layer's (sub, key) pair.
    ///
    /// Internal to `provision-stack`; the composer catches this to
    /// decide whether to invoke the fixer.
    #[error("overlap on {sub}:{key}")]
    Overlap {
        /// The sub namespace the conflicting key lives in.
        sub: String,
        /// The conflicting key.
        key: String,
    },

    /// The fixer could not reconcile the writable layer with immutable
    /// basic content because the two values differ.
    #[error("immutable conflict on {sub}:{key}: writable copy differs from basic content")]
    ImmutableConflict {
        /// The sub namespace the conflicting key lives in.
        sub: String,
        /// The conflicting key.
        key: String,
    },

    /// The external validator hard-rejected a candidate stack.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An operation was attempted on a store that has already been closed.
    #[error("store is closed")]
    Closed,

    /// An underlying filesystem or coordination-service operation failed.
    #[error("io error: {0}")]
    Io(String),

    /// A value could not be encoded or decoded by its codec.
    #[error("codec error: {0}")]
    Codec(String),
}

impl Error {
    /// Build a `NotFound` naming the (sub, key) pair.
    pub fn not_found(sub: &str, key: &str) -> Self {
        Error::NotFound(format!("{sub}:{key}"))
    }

    /// Build a `Config` error from any displayable cause.
    pub fn config(msg: impl fmt::Display) -> Self {
        Error::Config(msg.to_string())
    }

    /// Build an `Io` error from any displayable cause.
    pub fn io(msg: impl fmt::Display) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(e.to_string()),
            _ => Error::Io(e.to_string()),
        }
    }
}
