//! Read-only recovery status of a working directory

use std::path::{Path, PathBuf};

use crate::artifacts::{ArtifactStore, UNIT_FILE_PREFIX};
use crate::checkpoint::CheckpointStore;

/// Number of chapter files listed before the rest are summarised
pub const LISTED_CHAPTER_FILES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointStatus {
    Missing,
    Found { total_lines: usize, chapters: usize },
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub unit_dir: PathBuf,
    /// `None` when the line segment directory does not exist
    pub unit_files: Option<usize>,
    pub checkpoint_path: PathBuf,
    pub checkpoint: CheckpointStatus,
    /// Chapter-level audio files already in the working directory, sorted
    pub chapter_files: Vec<String>,
}

impl StatusReport {
    pub async fn gather(working_dir: &Path, artifacts: &ArtifactStore) -> Self {
        let checkpoints = CheckpointStore::new(working_dir);
        let checkpoint = match checkpoints.read().await {
            Ok(None) => CheckpointStatus::Missing,
            Ok(Some(checkpoint)) => CheckpointStatus::Found {
                total_lines: checkpoint.total_lines,
                chapters: checkpoint.chapter_count(),
            },
            Err(e) => CheckpointStatus::Unreadable(e.to_string()),
        };

        Self {
            unit_dir: artifacts.unit_dir().to_path_buf(),
            unit_files: artifacts.exists().then(|| artifacts.count_unit_files()),
            checkpoint_path: checkpoints.path().to_path_buf(),
            checkpoint,
            chapter_files: existing_chapter_files(working_dir, artifacts.extension()),
        }
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec!["Recovery Status Check".to_string(), "=".repeat(50)];

        match self.unit_files {
            Some(count) => {
                lines.push(format!("Line segments directory: {}", self.unit_dir.display()));
                lines.push(format!("Line segments found: {}", count));
            }
            None => {
                lines.push(format!(
                    "Line segments directory not found: {}",
                    self.unit_dir.display()
                ));
                return lines;
            }
        }

        match &self.checkpoint {
            CheckpointStatus::Missing => {
                lines.push(format!(
                    "Recovery checkpoint not found: {}",
                    self.checkpoint_path.display()
                ));
                return lines;
            }
            CheckpointStatus::Found {
                total_lines,
                chapters,
            } => {
                lines.push(format!(
                    "Recovery checkpoint found: {}",
                    self.checkpoint_path.display()
                ));
                lines.push(format!("Total lines in checkpoint: {}", total_lines));
                lines.push(format!("Chapters in checkpoint: {}", chapters));
            }
            CheckpointStatus::Unreadable(reason) => {
                lines.push(format!(
                    "Recovery checkpoint found: {}",
                    self.checkpoint_path.display()
                ));
                lines.push(format!("Could not read checkpoint details: {}", reason));
            }
        }

        if self.chapter_files.is_empty() {
            lines.push("No existing chapter files found".to_string());
        } else {
            lines.push(format!("Existing chapter files: {}", self.chapter_files.len()));
            for chapter in self.chapter_files.iter().take(LISTED_CHAPTER_FILES) {
                lines.push(format!("   - {}", chapter));
            }
            if self.chapter_files.len() > LISTED_CHAPTER_FILES {
                lines.push(format!(
                    "   ... and {} more",
                    self.chapter_files.len() - LISTED_CHAPTER_FILES
                ));
            }
        }

        lines.push(String::new());
        lines.push("You can retry assembly with:".to_string());
        lines.push("   audiobook-recovery retry".to_string());
        lines.push(
            "   audiobook-recovery retry --force-cleanup   # clean existing chapters first"
                .to_string(),
        );
        lines.push(
            "   audiobook-recovery retry --generate-final --source-document path/to/book.epub"
                .to_string(),
        );
        lines
    }
}

fn existing_chapter_files(working_dir: &Path, extension: &str) -> Vec<String> {
    let suffix = format!(".{extension}");
    let mut files: Vec<String> = match std::fs::read_dir(working_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(&suffix) && !name.starts_with(UNIT_FILE_PREFIX))
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}
