//! Error types for the catalogue store.

use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors emitted by catalogue components.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Underlying I/O failure while reading or writing the catalogue files.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// The document is not valid JSON or could not be rendered back to JSON.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
    /// The document is valid JSON but does not follow the catalogue layout.
    #[error("catalogue entry `{museum}` is malformed: {reason}")]
    Schema {
        /// Top-level key whose value failed validation.
        museum: String,
        /// Human-readable reason describing the mismatch.
        reason: String,
    },
    /// Artwork record failed validation.
    #[error("invalid artwork record: {0}")]
    InvalidRecord(&'static str),
}

impl CatalogueError {
    /// Helper to construct schema errors from string-like values.
    #[must_use]
    pub fn schema(museum: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            museum: museum.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for catalogue operations.
pub type CatalogueResult<T> = Result<T, CatalogueError>;
