//! Media Operation Interface
//!
//! The phase pipeline never touches audio itself. It calls the four
//! operations of [`MediaOperations`]: assemble, add silence, convert and
//! merge. Production runs use [`FfmpegMedia`]; tests use [`RecordingMedia`].

pub mod ffmpeg;
pub mod format;
pub mod mock;

pub use ffmpeg::FfmpegMedia;
pub use format::{NarratorVoice, OutputFormat};
pub use mock::{MediaCall, RecordingMedia};

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::subprocess::{ExitStatus, ProcessError};

/// The four external operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaOperation {
    Assemble,
    AddSilence,
    Convert,
    MergeFinal,
}

impl fmt::Display for MediaOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assemble => "assemble",
            Self::AddSilence => "add silence",
            Self::Convert => "convert",
            Self::MergeFinal => "merge final",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{program} failed with {status}: {stderr_tail}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr_tail: String,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Could not read duration of {}: {output:?}", path.display())]
    Probe { path: PathBuf, output: String },

    /// Raised by test doubles to simulate an operation failing
    #[error("{0}")]
    Simulated(String),
}

impl MediaError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// External audio operations driven by the phase pipeline
///
/// Every call may be slow and may fail. Implementations own any timeout
/// handling.
#[async_trait]
pub trait MediaOperations: Send + Sync {
    /// Concatenate the ordered line segments of one chapter into
    /// `<working_dir>/<group_id>`, returning that path
    async fn assemble(
        &self,
        group_id: &str,
        units: &[usize],
        unit_dir: &Path,
        working_dir: &Path,
    ) -> Result<PathBuf, MediaError>;

    /// Append `duration` of silence to a chapter file in place
    async fn add_silence(&self, group_file: &Path, duration: Duration) -> Result<(), MediaError>;

    /// Transcode `input` into `output`; the target format follows the output extension
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), MediaError>;

    /// Merge converted chapter files, in order, into the final audiobook
    async fn merge_final(
        &self,
        converted: &[PathBuf],
        working_dir: &Path,
        source_document: &Path,
        narrator: NarratorVoice,
    ) -> Result<PathBuf, MediaError>;
}
