//! Resume decision and pipeline state reconstruction

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::cleanup::{clean_stale_outputs, CleanupReport};
use super::validator::validate_segments;
use crate::artifacts::ArtifactStore;
use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::config::RecoveryConfig;
use crate::error::RecoveryError;
use crate::pipeline::PipelineState;

/// Whether a working directory can resume from the assembly phase
#[derive(Debug)]
pub enum ResumeDecision {
    Resumable(Checkpoint),
    NotResumable {
        reason: RecoveryError,
        /// Present when a valid checkpoint was found but segments are missing
        checkpoint: Option<Checkpoint>,
    },
}

impl ResumeDecision {
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::Resumable(_))
    }

    pub fn checkpoint(&self) -> Option<&Checkpoint> {
        match self {
            Self::Resumable(checkpoint) => Some(checkpoint),
            Self::NotResumable { checkpoint, .. } => checkpoint.as_ref(),
        }
    }

    pub fn reason(&self) -> Option<&RecoveryError> {
        match self {
            Self::Resumable(_) => None,
            Self::NotResumable { reason, .. } => Some(reason),
        }
    }

    /// Missing segment indices, ascending; empty unless segments were missing
    pub fn missing_indices(&self) -> &[usize] {
        match self.reason() {
            Some(RecoveryError::IncompleteUnits { missing, .. }) => missing,
            _ => &[],
        }
    }
}

/// Decides resumability and rebuilds pipeline state from the checkpoint
#[derive(Debug, Clone)]
pub struct ResumeController {
    working_dir: PathBuf,
    checkpoints: CheckpointStore,
    artifacts: ArtifactStore,
}

impl ResumeController {
    pub fn new(working_dir: impl Into<PathBuf>, artifacts: ArtifactStore) -> Self {
        let working_dir = working_dir.into();
        Self {
            checkpoints: CheckpointStore::new(&working_dir),
            working_dir,
            artifacts,
        }
    }

    pub fn from_config(working_dir: &Path, config: &RecoveryConfig) -> Self {
        Self::new(working_dir, config.artifact_store(working_dir))
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Query only; safe to call repeatedly
    pub async fn can_resume(&self) -> ResumeDecision {
        let checkpoint = match self.checkpoints.read().await {
            Ok(Some(checkpoint)) => checkpoint,
            Ok(None) => {
                return ResumeDecision::NotResumable {
                    reason: RecoveryError::NoCheckpoint {
                        working_dir: self.working_dir.clone(),
                    },
                    checkpoint: None,
                };
            }
            Err(source) => {
                let reason = RecoveryError::CorruptCheckpoint {
                    path: self.checkpoints.path().to_path_buf(),
                    source,
                };
                warn!("{}", reason);
                return ResumeDecision::NotResumable {
                    reason,
                    checkpoint: None,
                };
            }
        };

        let report = validate_segments(&self.artifacts, checkpoint.total_lines);
        if report.all_present() {
            info!(
                "Found {} line segments for {} chapters; resuming from assembly",
                checkpoint.total_lines,
                checkpoint.chapter_count()
            );
            ResumeDecision::Resumable(checkpoint)
        } else {
            ResumeDecision::NotResumable {
                reason: RecoveryError::IncompleteUnits {
                    expected: report.expected,
                    missing: report.missing,
                    unit_dir: report.unit_dir,
                },
                checkpoint: Some(checkpoint),
            }
        }
    }

    /// Project the checkpoint into pipeline state after clearing stale outputs
    pub fn reconstruct(&self, checkpoint: &Checkpoint) -> PipelineState {
        self.clean(&checkpoint.chapter_files);
        PipelineState::from_checkpoint(checkpoint)
    }

    /// Run the stale-output cleaner for these chapter files
    pub fn clean(&self, group_files: &[String]) -> CleanupReport {
        clean_stale_outputs(&self.working_dir, group_files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::unit_file_name;
    use crate::checkpoint::{GroupUnitMap, UnitMetadata};
    use tempfile::TempDir;

    async fn setup(total: usize, present: &[usize]) -> (TempDir, ResumeController) {
        let temp_dir = TempDir::new().unwrap();
        let unit_dir = temp_dir.path().join("line_segments");
        std::fs::create_dir_all(&unit_dir).unwrap();
        for &index in present {
            std::fs::write(unit_dir.join(unit_file_name(index, "wav")), b"RIFF").unwrap();
        }

        let map: GroupUnitMap = vec![("ch1.wav".to_string(), (0..total).collect())]
            .into_iter()
            .collect();
        let metadata = (0..total)
            .map(|index| UnitMetadata {
                index,
                line: format!("line {index}"),
                is_chapter_heading: index == 0,
            })
            .collect();
        let controller = ResumeController::new(temp_dir.path(), ArtifactStore::new(unit_dir));
        controller
            .checkpoints()
            .write_from_generation(map, vec!["ch1.wav".to_string()], metadata)
            .await
            .unwrap();
        (temp_dir, controller)
    }

    #[tokio::test]
    async fn test_resumable_when_all_segments_present() {
        let (_temp, controller) = setup(3, &[0, 1, 2]).await;
        let decision = controller.can_resume().await;
        assert!(decision.is_resumable());
        assert_eq!(decision.checkpoint().map(|c| c.total_lines), Some(3));
    }

    #[tokio::test]
    async fn test_missing_segments_block_resume() {
        let (_temp, controller) = setup(4, &[0, 2]).await;
        let decision = controller.can_resume().await;
        assert!(!decision.is_resumable());
        assert_eq!(decision.missing_indices(), &[1, 3]);
        assert!(decision.checkpoint().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_checkpoint_is_no_checkpoint() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("recovery_checkpoint.json"), "{ not json").unwrap();
        let controller =
            ResumeController::new(temp_dir.path(), ArtifactStore::new(temp_dir.path()));

        let decision = controller.can_resume().await;
        assert!(!decision.is_resumable());
        assert!(decision.checkpoint().is_none());
        assert!(matches!(
            decision.reason(),
            Some(RecoveryError::CorruptCheckpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_can_resume_is_repeatable() {
        let (temp, controller) = setup(2, &[0, 1]).await;
        std::fs::write(temp.path().join("ch1.wav"), b"partial").unwrap();

        assert!(controller.can_resume().await.is_resumable());
        assert!(controller.can_resume().await.is_resumable());
        assert!(temp.path().join("ch1.wav").exists());
    }

    #[tokio::test]
    async fn test_reconstruct_cleans_partial_chapters() {
        let (temp, controller) = setup(2, &[0, 1]).await;
        std::fs::write(temp.path().join("ch1.wav"), b"partial").unwrap();
        std::fs::write(temp.path().join("chapter_list_ch1.txt"), b"file").unwrap();

        let checkpoint = controller.checkpoints().load().await.unwrap();
        let state = controller.reconstruct(&checkpoint);

        assert_eq!(state.group_order, vec!["ch1.wav".to_string()]);
        assert_eq!(state.units_for("ch1.wav").unwrap(), &[0, 1]);
        assert!(!temp.path().join("ch1.wav").exists());
        assert!(!temp.path().join("chapter_list_ch1.txt").exists());
        assert!(temp.path().join("recovery_checkpoint.json").exists());
    }
}
