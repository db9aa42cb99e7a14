//! Common test utilities and helpers
#![allow(dead_code)]

use anyhow::Result;
use audiobook_recovery::artifacts::{unit_file_name, ArtifactStore};
use audiobook_recovery::checkpoint::{Checkpoint, CheckpointStore, GroupUnitMap, UnitMetadata};
use audiobook_recovery::resume::ResumeController;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a working directory with a checkpoint and line segments
pub struct FixtureBuilder {
    temp_dir: TempDir,
    chapters: Vec<(String, Vec<usize>)>,
    missing: HashSet<usize>,
    empty: HashSet<usize>,
    write_checkpoint: bool,
    files: Vec<(PathBuf, String)>,
}

impl FixtureBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            chapters: Vec::new(),
            missing: HashSet::new(),
            empty: HashSet::new(),
            write_checkpoint: true,
            files: Vec::new(),
        })
    }

    /// Add a chapter whose lines follow the previous chapter's
    pub fn with_chapter(mut self, name: &str, lines: usize) -> Self {
        let start: usize = self.chapters.iter().map(|(_, units)| units.len()).sum();
        self.chapters
            .push((name.to_string(), (start..start + lines).collect()));
        self
    }

    /// Leave this line segment off disk
    pub fn without_segment(mut self, index: usize) -> Self {
        self.missing.insert(index);
        self
    }

    /// Write this line segment as an empty file
    pub fn with_empty_segment(mut self, index: usize) -> Self {
        self.empty.insert(index);
        self
    }

    pub fn without_checkpoint(mut self) -> Self {
        self.write_checkpoint = false;
        self
    }

    /// Add a file relative to the working directory
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.files
            .push((path.as_ref().to_path_buf(), content.to_string()));
        self
    }

    pub async fn build(self) -> Result<Fixture> {
        let working_dir = self.temp_dir.path().to_path_buf();
        let unit_dir = working_dir.join("line_segments");
        fs::create_dir_all(&unit_dir)?;

        let total: usize = self.chapters.iter().map(|(_, units)| units.len()).sum();
        for index in 0..total {
            if self.missing.contains(&index) {
                continue;
            }
            let content: &[u8] = if self.empty.contains(&index) {
                b""
            } else {
                b"RIFF"
            };
            fs::write(unit_dir.join(unit_file_name(index, "wav")), content)?;
        }

        let checkpoint = checkpoint_for(&self.chapters);
        if self.write_checkpoint {
            CheckpointStore::new(&working_dir).write(&checkpoint).await?;
        }

        for (path, content) in self.files {
            let full_path = working_dir.join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(full_path, content)?;
        }

        Ok(Fixture {
            temp_dir: self.temp_dir,
            checkpoint,
        })
    }
}

/// Checkpoint for chapters laid out in order
pub fn checkpoint_for(chapters: &[(String, Vec<usize>)]) -> Checkpoint {
    let map: GroupUnitMap = chapters.iter().cloned().collect();
    let files = chapters.iter().map(|(name, _)| name.clone()).collect();
    let total: usize = chapters.iter().map(|(_, units)| units.len()).sum();
    let metadata = (0..total)
        .map(|index| UnitMetadata {
            index,
            line: format!("Line number {index}."),
            is_chapter_heading: chapters
                .iter()
                .any(|(_, units)| units.first() == Some(&index)),
        })
        .collect();
    Checkpoint::from_generation(map, files, metadata)
}

pub struct Fixture {
    temp_dir: TempDir,
    pub checkpoint: Checkpoint,
}

impl Fixture {
    pub fn working_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn unit_dir(&self) -> PathBuf {
        self.working_dir().join("line_segments")
    }

    pub fn controller(&self) -> ResumeController {
        ResumeController::new(self.working_dir(), ArtifactStore::new(self.unit_dir()))
    }

    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.working_dir().join(path).exists()
    }

    /// Sorted file names in the working directory
    pub fn listing(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.working_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
