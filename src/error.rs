//! Error types for the frame engine.
//!
//! Lookup misses are never errors: absent frames, slots, and facets surface as
//! `None` or `false` on every read path. Only the persistence boundary and
//! ambient configuration can fault.

use thiserror::Error;

/// Errors raised by the persistence codec and ambient configuration.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed frame document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
