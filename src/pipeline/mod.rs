//! Phase pipeline: Assembling → PostProcessing → Converting → FinalMerging → Done
//!
//! Chapters are processed one at a time, in checkpoint order, and every phase
//! finishes for all chapters before the next begins. The first failing media
//! operation aborts the run; there are no automatic retries. Re-running the
//! whole resume flow is safe because each phase derives its inputs from the
//! checkpoint and the stale-output cleaner clears partial chapter files first.

pub mod error;
pub mod phase;
pub mod state;

pub use error::PipelineError;
pub use phase::{progress_channel, PipelinePhase, ProgressEvent, ProgressReceiver, ProgressSender};
pub use state::{FinalMergeRequest, PipelineOptions, PipelineState};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::media::{MediaError, MediaOperation, MediaOperations};

/// Silence appended to every chapter during post-processing
pub const SILENCE_PADDING: Duration = Duration::from_millis(1000);

/// What a completed run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Converted chapter files, in chapter order
    pub converted_files: Vec<PathBuf>,
    pub final_artifact: Option<PathBuf>,
}

/// Drives the remaining phases against a [`MediaOperations`] implementation
pub struct PhasePipeline {
    media: Arc<dyn MediaOperations>,
}

impl PhasePipeline {
    pub fn new(media: Arc<dyn MediaOperations>) -> Self {
        Self { media }
    }

    pub async fn run(
        &self,
        state: &PipelineState,
        options: &PipelineOptions,
        events: &ProgressSender,
    ) -> Result<PipelineSummary, PipelineError> {
        let mut summary = PipelineSummary::default();

        if state.group_count() == 0 {
            info!("Checkpoint lists no chapters; nothing to assemble");
            emit(events, ProgressEvent::Completed);
            return Ok(summary);
        }

        let final_merge = options.final_merge.is_some();
        let mut phase = PipelinePhase::Assembling;
        loop {
            debug!("Entering phase: {}", phase);
            match phase {
                PipelinePhase::Assembling => self.assemble_all(state, options, events).await?,
                PipelinePhase::PostProcessing => self.pad_all(state, options, events).await?,
                PipelinePhase::Converting => {
                    summary.converted_files = self.convert_all(state, options, events).await?
                }
                PipelinePhase::FinalMerging => {
                    summary.final_artifact =
                        Some(self.merge(&summary.converted_files, options, events).await?)
                }
                PipelinePhase::Done => break,
            }
            phase = match phase.next(final_merge) {
                Some(next) => next,
                None => break,
            };
        }

        emit(events, ProgressEvent::Completed);
        Ok(summary)
    }

    async fn assemble_all(
        &self,
        state: &PipelineState,
        options: &PipelineOptions,
        events: &ProgressSender,
    ) -> Result<(), PipelineError> {
        let phase = PipelinePhase::Assembling;
        let total = state.group_count();
        emit(events, ProgressEvent::PhaseStarted { phase, total });

        for (position, group) in state.group_order.iter().enumerate() {
            let units = state.units_for(group)?;
            self.media
                .assemble(group, units, &options.unit_dir, &options.working_dir)
                .await
                .map_err(|e| failure(phase, MediaOperation::Assemble, Some(group), e))?;
            emit(
                events,
                ProgressEvent::GroupAssembled {
                    group: group.clone(),
                    position: position + 1,
                    total,
                },
            );
        }

        emit(events, ProgressEvent::PhaseCompleted { phase });
        Ok(())
    }

    async fn pad_all(
        &self,
        state: &PipelineState,
        options: &PipelineOptions,
        events: &ProgressSender,
    ) -> Result<(), PipelineError> {
        let phase = PipelinePhase::PostProcessing;
        let total = state.group_count();
        emit(events, ProgressEvent::PhaseStarted { phase, total });

        for (position, group) in state.group_order.iter().enumerate() {
            let path = options.working_dir.join(group);
            self.media
                .add_silence(&path, SILENCE_PADDING)
                .await
                .map_err(|e| failure(phase, MediaOperation::AddSilence, Some(group), e))?;
            emit(
                events,
                ProgressEvent::SilenceAdded {
                    group: group.clone(),
                    position: position + 1,
                    total,
                },
            );
        }

        emit(events, ProgressEvent::PhaseCompleted { phase });
        Ok(())
    }

    async fn convert_all(
        &self,
        state: &PipelineState,
        options: &PipelineOptions,
        events: &ProgressSender,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let phase = PipelinePhase::Converting;
        let total = state.group_count();
        emit(events, ProgressEvent::PhaseStarted { phase, total });

        let mut converted = Vec::with_capacity(total);
        for (position, group) in state.group_order.iter().enumerate() {
            let input = options.working_dir.join(group);
            let output = options.converted_path(group);
            self.media
                .convert(&input, &output)
                .await
                .map_err(|e| failure(phase, MediaOperation::Convert, Some(group), e))?;
            emit(
                events,
                ProgressEvent::GroupConverted {
                    group: group.clone(),
                    output: output
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    position: position + 1,
                    total,
                },
            );
            converted.push(output);
        }

        emit(events, ProgressEvent::PhaseCompleted { phase });
        Ok(converted)
    }

    async fn merge(
        &self,
        converted: &[PathBuf],
        options: &PipelineOptions,
        events: &ProgressSender,
    ) -> Result<PathBuf, PipelineError> {
        let phase = PipelinePhase::FinalMerging;
        let request = options
            .final_merge
            .as_ref()
            .ok_or(PipelineError::MissingSourceDocument)?;
        emit(
            events,
            ProgressEvent::PhaseStarted {
                phase,
                total: converted.len(),
            },
        );

        let path = self
            .media
            .merge_final(
                converted,
                &options.working_dir,
                &request.source_document,
                request.narrator,
            )
            .await
            .map_err(|e| failure(phase, MediaOperation::MergeFinal, None, e))?;

        emit(events, ProgressEvent::FinalArtifactProduced { path: path.clone() });
        emit(events, ProgressEvent::PhaseCompleted { phase });
        Ok(path)
    }
}

fn failure(
    phase: PipelinePhase,
    operation: MediaOperation,
    group: Option<&str>,
    source: MediaError,
) -> PipelineError {
    PipelineError::MediaOperation {
        phase,
        operation,
        group: group.map(str::to_string),
        source,
    }
}

/// A closed receiver only means nobody is displaying progress
fn emit(events: &ProgressSender, event: ProgressEvent) {
    debug!("{}", event.describe());
    let _ = events.send(event);
}
