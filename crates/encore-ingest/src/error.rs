//! Error types for fixture loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading fixtures.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A fixture file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A fixture file is not a JSON array of objects.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An error propagated from the core store.
    #[error("database error: {0}")]
    Database(#[from] encore_core::Error),
}

/// Convenience alias for ingest results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
