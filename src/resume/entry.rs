//! Two-branch entry point: resume from the checkpoint, or generate everything

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use super::controller::{ResumeController, ResumeDecision};
use crate::artifacts::ArtifactStore;
use crate::checkpoint::{GroupUnitMap, UnitMetadata};
use crate::error::{RecoveryError, Result};
use crate::media::NarratorVoice;
use crate::pipeline::{PhasePipeline, PipelineOptions, PipelineState, PipelineSummary, ProgressSender};

/// What the line generation phase is asked to produce
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub working_dir: PathBuf,
    pub artifacts: ArtifactStore,
    pub narrator: NarratorVoice,
    pub emotion_tags: bool,
}

/// Chapter structure returned by a completed generation phase
///
/// Chapter ids are file names in the working directory; build them from the
/// chapter title with [`sanitize_group_name`](super::sanitize_group_name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBook {
    pub chapter_line_map: GroupUnitMap,
    pub chapter_files: Vec<String>,
    pub results_metadata: Vec<UnitMetadata>,
}

/// The line generation phase (text-to-speech), implemented elsewhere
#[async_trait]
pub trait FullGeneration: Send + Sync {
    /// Write every line segment into `request.artifacts` and describe the chapters
    async fn generate(
        &self,
        request: &GenerationRequest,
        events: &ProgressSender,
    ) -> anyhow::Result<GeneratedBook>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPath {
    Resumed,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub path: RunPath,
    pub summary: PipelineSummary,
}

/// Resume from the assembly phase when possible, otherwise generate first
///
/// After a full generation the checkpoint is written before assembly starts,
/// so a failure in any later phase can be resumed.
pub async fn run_with_recovery(
    controller: &ResumeController,
    generation: &dyn FullGeneration,
    pipeline: &PhasePipeline,
    options: &PipelineOptions,
    request: &GenerationRequest,
    events: &ProgressSender,
) -> Result<RunOutcome> {
    let (path, state) = match controller.can_resume().await {
        ResumeDecision::Resumable(checkpoint) => {
            info!("Recovery mode: found existing line segments, resuming from assembly phase");
            (RunPath::Resumed, controller.reconstruct(&checkpoint))
        }
        ResumeDecision::NotResumable { reason, .. } => {
            info!("Running full generation: {}", reason);
            let book = generation
                .generate(request, events)
                .await
                .map_err(|e| RecoveryError::GenerationFailure {
                    message: format!("{:#}", e),
                })?;
            let checkpoint = controller
                .checkpoints()
                .write_from_generation(book.chapter_line_map, book.chapter_files, book.results_metadata)
                .await
                .map_err(RecoveryError::CheckpointWrite)?;
            (RunPath::Generated, PipelineState::from_checkpoint(&checkpoint))
        }
    };

    let summary = pipeline.run(&state, options, events).await?;
    Ok(RunOutcome { path, summary })
}
