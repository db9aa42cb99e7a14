//! `retry` command: resume assembly from the recovery checkpoint

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::app::AppConfig;
use crate::cli::args::RetryArgs;
use crate::cli::progress::spawn_progress_display;
use crate::error::RecoveryError;
use crate::media::FfmpegMedia;
use crate::pipeline::{progress_channel, FinalMergeRequest, PhasePipeline, PipelineOptions};
use crate::resume::messages::{
    format_cleanup_summary, format_output_listing, format_resume_summary, list_output_files,
};
use crate::resume::{ResumeController, ResumeDecision};
use crate::subprocess::production_runner;

pub async fn run_retry_command(args: RetryArgs, app: &AppConfig) -> Result<()> {
    let final_merge =
        FinalMergeRequest::from_flags(args.generate_final, args.source_document.clone(), args.narrator)
            .map_err(|_| {
                RecoveryError::invalid_arguments("--generate-final requires --source-document")
            })?;
    if args.add_emotion_tags {
        debug!("Emotion tags apply to line generation; assembly is unchanged");
    }

    let config = &app.recovery;
    let controller = ResumeController::from_config(&app.working_dir, config);

    println!("Checking for existing line segments and recovery data...");
    let checkpoint = match controller.can_resume().await {
        ResumeDecision::Resumable(checkpoint) => checkpoint,
        ResumeDecision::NotResumable { reason, .. } => return Err(reason.into()),
    };
    for line in format_resume_summary(&checkpoint) {
        println!("{}", line);
    }

    let state = controller.reconstruct(&checkpoint);

    if args.force_cleanup {
        println!("Force cleanup enabled - removing existing chapter files...");
        let report = controller.clean(&state.group_order);
        println!(
            "{}",
            format_cleanup_summary(report.removed.len(), report.failures.len())
        );
    }

    println!("Starting assembly and post-processing...");
    let options = PipelineOptions::new(&app.working_dir, config.unit_dir(&app.working_dir))
        .with_output_format(args.output_format)
        .with_final_merge(final_merge);
    let media = FfmpegMedia::new(production_runner(), config);
    let pipeline = PhasePipeline::new(Arc::new(media));

    let (tx, rx) = progress_channel();
    let display = spawn_progress_display(rx);
    let result = pipeline.run(&state, &options, &tx).await;
    drop(tx);
    display.await.context("Progress display task failed")?;

    result.map_err(RecoveryError::from)?;
    println!("Assembly completed successfully!");

    let files = list_output_files(&config.output_dir);
    let listing = format_output_listing(&config.output_dir, &files);
    if !listing.is_empty() {
        println!();
        for line in listing {
            println!("{}", line);
        }
    }
    Ok(())
}
