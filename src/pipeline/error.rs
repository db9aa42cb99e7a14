//! Failures that abort the phase pipeline

use thiserror::Error;

use super::phase::PipelinePhase;
use crate::media::{MediaError, MediaOperation};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// An external media operation failed; the run stops here
    #[error("{operation} failed for {target} while {phase}: {source}", target = .group.as_deref().unwrap_or("final audiobook"))]
    MediaOperation {
        phase: PipelinePhase,
        operation: MediaOperation,
        group: Option<String>,
        #[source]
        source: MediaError,
    },

    #[error("Chapter `{group}` has no line mapping")]
    UnmappedGroup { group: String },

    #[error("A final audiobook was requested without a source document")]
    MissingSourceDocument,
}

impl PipelineError {
    pub fn phase(&self) -> Option<PipelinePhase> {
        match self {
            Self::MediaOperation { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Chapter the failing operation was working on
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::MediaOperation { group, .. } => group.as_deref(),
            Self::UnmappedGroup { group } => Some(group),
            Self::MissingSourceDocument => None,
        }
    }
}
