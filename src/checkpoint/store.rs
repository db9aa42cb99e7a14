//! Persistence of the recovery checkpoint
//!
//! The checkpoint is written to a temporary sibling and renamed into place so a
//! concurrent reader sees either the previous file or the complete new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::errors::CheckpointError;
use super::types::{Checkpoint, GroupUnitMap, UnitMetadata, CHECKPOINT_FILE_NAME};

/// Reads and writes the single checkpoint file of a working directory
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(working_dir: &Path) -> Self {
        Self {
            path: working_dir.join(CHECKPOINT_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Validate and persist a checkpoint, replacing any previous one
    pub async fn write(&self, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        checkpoint.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CheckpointError::io("create directory", parent, e))?;
        }

        let json =
            serde_json::to_string_pretty(checkpoint).map_err(CheckpointError::Serialization)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, json).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CheckpointError::io("write", &temp_path, e));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CheckpointError::io("move into place", &self.path, e));
        }

        info!(
            "Recovery checkpoint created at {} ({} lines, {} chapters)",
            self.path.display(),
            checkpoint.total_lines,
            checkpoint.chapter_count()
        );
        Ok(())
    }

    /// Build a checkpoint from generation results and persist it
    pub async fn write_from_generation(
        &self,
        chapter_line_map: GroupUnitMap,
        chapter_files: Vec<String>,
        results_metadata: Vec<UnitMetadata>,
    ) -> Result<Checkpoint, CheckpointError> {
        let checkpoint =
            Checkpoint::from_generation(chapter_line_map, chapter_files, results_metadata);
        self.write(&checkpoint).await?;
        Ok(checkpoint)
    }

    /// Read the checkpoint
    ///
    /// `Ok(None)` when no file exists. A file that cannot be parsed or that
    /// violates checkpoint invariants is an error the caller must treat like
    /// an absent checkpoint.
    pub async fn read(&self) -> Result<Option<Checkpoint>, CheckpointError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No recovery checkpoint at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(CheckpointError::io("read", &self.path, e)),
        };

        let checkpoint: Checkpoint =
            serde_json::from_str(&content).map_err(|source| CheckpointError::Parse {
                path: self.path.clone(),
                source,
            })?;

        checkpoint.validate()?;

        if !checkpoint.metadata_consistent() {
            warn!(
                "Checkpoint metadata lists {} entries for {} lines; continuing with the chapter mapping",
                checkpoint.results_metadata.len(),
                checkpoint.total_lines
            );
        }

        Ok(Some(checkpoint))
    }

    /// Read the checkpoint, downgrading any failure to "no checkpoint"
    pub async fn load(&self) -> Option<Checkpoint> {
        match self.read().await {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                warn!("Could not load recovery checkpoint: {}", e);
                None
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
