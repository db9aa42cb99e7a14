use std::path::PathBuf;
use thiserror::Error;

use crate::checkpoint::CheckpointError;
use crate::pipeline::PipelineError;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for recovery runs
///
/// The first three variants are resume blockers: they are recovered locally
/// into a "cannot resume" outcome. `CleanupFailure` is logged and swallowed.
/// Everything else terminates the run.
#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("No recovery checkpoint found in {}", working_dir.display())]
    NoCheckpoint { working_dir: PathBuf },

    #[error("Recovery checkpoint at {} is unusable: {source}", path.display())]
    CorruptCheckpoint {
        path: PathBuf,
        #[source]
        source: CheckpointError,
    },

    #[error("Missing {} of {expected} line segments in {}", missing.len(), unit_dir.display())]
    IncompleteUnits {
        expected: usize,
        missing: Vec<usize>,
        unit_dir: PathBuf,
    },

    #[error("Could not remove stale file {}: {source}", path.display())]
    CleanupFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    MediaOperationFailure(#[from] PipelineError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Line generation failed: {message}")]
    GenerationFailure { message: String },

    #[error("Recovery checkpoint could not be saved: {0}")]
    CheckpointWrite(#[source] CheckpointError),
}

impl RecoveryError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::NoCheckpoint { .. } => ErrorCode::NO_CHECKPOINT,
            Self::CorruptCheckpoint { .. } => ErrorCode::CORRUPT_CHECKPOINT,
            Self::IncompleteUnits { .. } => ErrorCode::INCOMPLETE_UNITS,
            Self::CleanupFailure { .. } => ErrorCode::CLEANUP_FAILURE,
            Self::MediaOperationFailure(_) => ErrorCode::MEDIA_OPERATION_FAILURE,
            Self::Config { .. } => ErrorCode::CONFIG_INVALID,
            Self::InvalidArguments { .. } => ErrorCode::INVALID_ARGUMENTS,
            Self::GenerationFailure { .. } => ErrorCode::GENERATION_FAILURE,
            Self::CheckpointWrite(_) => ErrorCode::CHECKPOINT_WRITE_FAILURE,
        }
    }

    /// Whether this error only means "resume is not possible"
    pub fn is_resume_blocker(&self) -> bool {
        matches!(
            self,
            Self::NoCheckpoint { .. } | Self::CorruptCheckpoint { .. } | Self::IncompleteUnits { .. }
        )
    }

    /// Every failure surfaces as exit status 1
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::NoCheckpoint { .. } | Self::CorruptCheckpoint { .. } => {
                format!("Cannot resume: {}", self)
            }
            Self::IncompleteUnits {
                expected, missing, ..
            } => format!(
                "Cannot resume: missing {} line segments out of {}",
                missing.len(),
                expected
            ),
            Self::MediaOperationFailure(err) => format!("Assembly failed: {}", err),
            _ => self.to_string(),
        }
    }

    /// Actionable next steps for the user
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::NoCheckpoint { .. } | Self::IncompleteUnits { .. } => {
                vec!["You need to run the full generation process first to create line segments"]
            }
            Self::CorruptCheckpoint { .. } => vec![
                "The checkpoint file could not be used; re-run the full generation process to recreate it",
            ],
            Self::MediaOperationFailure(_) => vec![
                "Check that FFmpeg is properly installed and accessible on PATH",
                "Verify the working directory has sufficient disk space",
                "Try running with --force-cleanup to remove partial files",
                "Check file permissions in the working directory",
            ],
            Self::CleanupFailure { .. } => {
                vec!["Check file permissions in the working directory"]
            }
            Self::Config { .. } => vec!["Fix recovery.toml or the AUDIOBOOK_RECOVERY_* variables"],
            Self::InvalidArguments { .. } => vec!["Run with --help to see the accepted options"],
            Self::GenerationFailure { .. } | Self::CheckpointWrite(_) => {
                vec!["Verify the working directory is writable and has sufficient disk space"]
            }
        }
    }

    /// Message with code, error chain and description for verbose output
    pub fn developer_message(&self) -> String {
        let mut message = format!(
            "[E{:04}] {} ({})",
            self.code(),
            self,
            describe_error_code(self.code())
        );
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {}", cause));
            source = cause.source();
        }
        if let Self::IncompleteUnits { missing, .. } = self {
            message.push_str(&format!("\n  missing indices: {:?}", missing));
        }
        message
    }
}

pub type Result<T> = std::result::Result<T, RecoveryError>;
