//! Filesystem-backed store for per-line audio segments
//!
//! Line segments live in a fixed subdirectory of the working directory and are
//! named `line_{index:06}.<ext>`. The six-digit padding is shared with the
//! generation phase and must not change.

use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix for line segments
pub const UNIT_FILE_PREFIX: &str = "line_";

/// Default subdirectory of the working directory holding line segments
pub const DEFAULT_LINE_SEGMENTS_DIR: &str = "line_segments";

/// Default audio extension of line segments
pub const DEFAULT_LINE_EXTENSION: &str = "wav";

/// File name of the line segment at `index`
pub fn unit_file_name(index: usize, extension: &str) -> String {
    format!("{UNIT_FILE_PREFIX}{index:06}.{extension}")
}

/// Read-only view over the line segment directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    unit_dir: PathBuf,
    extension: String,
}

impl ArtifactStore {
    pub fn new(unit_dir: impl Into<PathBuf>) -> Self {
        Self {
            unit_dir: unit_dir.into(),
            extension: DEFAULT_LINE_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn unit_dir(&self) -> &Path {
        &self.unit_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Whether the segment directory exists at all
    pub fn exists(&self) -> bool {
        self.unit_dir.is_dir()
    }

    pub fn unit_path(&self, index: usize) -> PathBuf {
        self.unit_dir.join(unit_file_name(index, &self.extension))
    }

    /// A segment counts as present only if it is a regular, non-empty file
    pub fn is_present(&self, index: usize) -> bool {
        fs::metadata(self.unit_path(index))
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Count files that look like line segments, regardless of index range
    pub fn count_unit_files(&self) -> usize {
        let suffix = format!(".{}", self.extension);
        match fs::read_dir(&self.unit_dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    name.starts_with(UNIT_FILE_PREFIX) && name.ends_with(&suffix)
                })
                .count(),
            Err(_) => 0,
        }
    }
}
