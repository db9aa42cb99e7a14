//! CLI argument structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::media::{NarratorVoice, OutputFormat};

/// Resume audiobook assembly from existing line segments
#[derive(Parser, Debug)]
#[command(name = "audiobook-recovery")]
#[command(about = "Resume audiobook assembly from existing line segments", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the default `retry` command; unused when a subcommand is given
    #[command(flatten)]
    pub retry: RetryArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resume assembly from the recovery checkpoint (default)
    Retry(RetryArgs),

    /// Show line segments, checkpoint and chapter files in the working directory
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RetryArgs {
    /// Working directory containing the checkpoint and line segments
    #[arg(long = "working-dir", visible_alias = "temp-dir", default_value = "temp_audio")]
    pub working_dir: PathBuf,

    /// Format of the converted chapter files
    #[arg(long, value_enum, default_value_t = OutputFormat::M4a)]
    pub output_format: OutputFormat,

    /// Narrator voice recorded in the final audiobook
    #[arg(
        long = "narrator-voice",
        visible_alias = "narrator-gender",
        value_enum,
        default_value_t = NarratorVoice::Male
    )]
    pub narrator: NarratorVoice,

    /// Source book, required with --generate-final
    #[arg(long, visible_alias = "book-path", value_name = "PATH")]
    pub source_document: Option<PathBuf>,

    /// Merge the converted chapters into a single M4B audiobook
    #[arg(long, visible_alias = "generate-m4b")]
    pub generate_final: bool,

    /// Include emotion tags (applies to line generation)
    #[arg(long)]
    pub add_emotion_tags: bool,

    /// Remove existing chapter files again before assembly
    #[arg(long)]
    pub force_cleanup: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Working directory containing the checkpoint and line segments
    #[arg(long = "working-dir", visible_alias = "temp-dir", default_value = "temp_audio")]
    pub working_dir: PathBuf,
}
