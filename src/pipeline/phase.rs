//! Pipeline phases and the progress events they emit

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Linear state machine of a resumed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Assembling,
    PostProcessing,
    Converting,
    FinalMerging,
    Done,
}

impl PipelinePhase {
    /// Phase that follows this one; `FinalMerging` only when a merge was requested
    pub fn next(self, final_merge: bool) -> Option<Self> {
        match self {
            Self::Assembling => Some(Self::PostProcessing),
            Self::PostProcessing => Some(Self::Converting),
            Self::Converting if final_merge => Some(Self::FinalMerging),
            Self::Converting | Self::FinalMerging => Some(Self::Done),
            Self::Done => None,
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assembling => "assembling",
            Self::PostProcessing => "post-processing",
            Self::Converting => "converting",
            Self::FinalMerging => "final merging",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// One step of progress, produced by the pipeline for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    PhaseStarted {
        phase: PipelinePhase,
        total: usize,
    },
    GroupAssembled {
        group: String,
        position: usize,
        total: usize,
    },
    SilenceAdded {
        group: String,
        position: usize,
        total: usize,
    },
    GroupConverted {
        group: String,
        output: String,
        position: usize,
        total: usize,
    },
    PhaseCompleted {
        phase: PipelinePhase,
    },
    FinalArtifactProduced {
        path: PathBuf,
    },
    Completed,
}

impl ProgressEvent {
    /// Human-readable status line
    pub fn describe(&self) -> String {
        match self {
            Self::PhaseStarted { phase, total } => match phase {
                PipelinePhase::FinalMerging => "Generating final M4B audiobook file...".to_string(),
                _ => format!("Started {} ({} chapters)", phase, total),
            },
            Self::GroupAssembled { group, .. } => format!("Assembled chapter: {}", group),
            Self::SilenceAdded { group, .. } => format!("Added silence to chapter: {}", group),
            Self::GroupConverted { output, .. } => format!("Converted chapter: {}", output),
            Self::PhaseCompleted { phase } => match phase {
                PipelinePhase::Assembling => "Completed assembling all chapters".to_string(),
                PipelinePhase::PostProcessing => "Completed adding silence to all chapters".to_string(),
                PipelinePhase::Converting => "Completed post-processing all chapters".to_string(),
                other => format!("Completed {}", other),
            },
            Self::FinalArtifactProduced { path } => {
                format!("M4B audiobook file generated: {}", path.display())
            }
            Self::Completed => "Audiobook generation completed successfully!".to_string(),
        }
    }

    /// Phase the event belongs to, `Done` for the final completion event
    pub fn phase(&self) -> PipelinePhase {
        match self {
            Self::PhaseStarted { phase, .. } | Self::PhaseCompleted { phase } => *phase,
            Self::GroupAssembled { .. } => PipelinePhase::Assembling,
            Self::SilenceAdded { .. } => PipelinePhase::PostProcessing,
            Self::GroupConverted { .. } => PipelinePhase::Converting,
            Self::FinalArtifactProduced { .. } => PipelinePhase::FinalMerging,
            Self::Completed => PipelinePhase::Done,
        }
    }
}

pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_without_merge() {
        let mut phases = vec![PipelinePhase::Assembling];
        while let Some(next) = phases.last().and_then(|p| p.next(false)) {
            phases.push(next);
        }
        assert_eq!(
            phases,
            vec![
                PipelinePhase::Assembling,
                PipelinePhase::PostProcessing,
                PipelinePhase::Converting,
                PipelinePhase::Done,
            ]
        );
    }

    #[test]
    fn test_phase_order_with_merge() {
        assert_eq!(
            PipelinePhase::Converting.next(true),
            Some(PipelinePhase::FinalMerging)
        );
        assert_eq!(PipelinePhase::FinalMerging.next(true), Some(PipelinePhase::Done));
        assert_eq!(PipelinePhase::Done.next(true), None);
    }

    #[test]
    fn test_describe() {
        let event = ProgressEvent::GroupAssembled {
            group: "ch1.wav".into(),
            position: 1,
            total: 2,
        };
        assert_eq!(event.describe(), "Assembled chapter: ch1.wav");
        assert_eq!(event.phase(), PipelinePhase::Assembling);
        assert_eq!(
            ProgressEvent::Completed.describe(),
            "Audiobook generation completed successfully!"
        );
    }
}
