//! Terminal display of pipeline progress events

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

use crate::pipeline::{PipelinePhase, ProgressEvent, ProgressReceiver};

fn phase_label(phase: PipelinePhase) -> &'static str {
    match phase {
        PipelinePhase::Assembling => "Assembling Chapters",
        PipelinePhase::PostProcessing => "Adding Silence",
        PipelinePhase::Converting => "Converting Chapters",
        PipelinePhase::FinalMerging => "Merging Audiobook",
        PipelinePhase::Done => "Done",
    }
}

fn phase_bar(phase: PipelinePhase, total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{msg}: {wide_bar:.cyan/blue} {pos}/{len} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message(phase_label(phase));
    bar
}

/// Consume events until the pipeline drops its sender
///
/// Status lines go to stdout; the bar draws on stderr and hides itself when
/// stderr is not a terminal.
pub fn spawn_progress_display(mut events: ProgressReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        while let Some(event) = events.recv().await {
            match &event {
                ProgressEvent::PhaseStarted { phase, total } => {
                    bar = Some(phase_bar(*phase, *total));
                    if *phase == PipelinePhase::FinalMerging {
                        println!("{}", event.describe());
                    }
                }
                ProgressEvent::GroupAssembled { .. }
                | ProgressEvent::SilenceAdded { .. }
                | ProgressEvent::GroupConverted { .. } => match &bar {
                    Some(bar) => {
                        bar.inc(1);
                        bar.suspend(|| println!("{}", event.describe()));
                    }
                    None => println!("{}", event.describe()),
                },
                ProgressEvent::PhaseCompleted { .. } => {
                    if let Some(bar) = bar.take() {
                        bar.finish_and_clear();
                    }
                    println!("{}", event.describe());
                }
                ProgressEvent::FinalArtifactProduced { .. } | ProgressEvent::Completed => {
                    println!("{}", event.describe());
                }
            }
        }
        if let Some(bar) = bar {
            bar.abandon();
        }
    })
}
