//! Errors raised while reading, validating or writing the recovery checkpoint

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// I/O error during checkpoint operations
    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exists but is not a checkpoint-shaped JSON document
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parsed, but the structure violates checkpoint invariants
    #[error("Invalid checkpoint: {reason}")]
    Invalid { reason: String },

    #[error("Failed to serialize checkpoint: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl CheckpointError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether the file was present but unusable (as opposed to an I/O failure)
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Invalid { .. })
    }
}
