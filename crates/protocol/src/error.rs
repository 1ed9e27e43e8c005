//! Error types for the protocol crate.

use thiserror::Error;

/// Failures while building or decoding documentation payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A payload could not be encoded as JSON.
    #[error("cannot encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Bytes were not JSON of the expected shape.
    #[error("malformed payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// The filename does not name a listable document.
    #[error("{filename:?} is not a document (expected a visible *.md file)")]
    NotADocument {
        /// The rejected filename.
        filename: String,
    },
}

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
