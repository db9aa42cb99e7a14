//! Subprocess abstraction used to drive ffmpeg and ffprobe
//!
//! Production code runs commands through [`TokioProcessRunner`]; tests swap in
//! [`MockProcessRunner`] to script exit codes, output and written files.

pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;

#[cfg(test)]
mod tests;

pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::{MockProcessRunner, ScriptedCommand};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};

use std::sync::Arc;

/// Shared handle to the production runner
pub fn production_runner() -> Arc<dyn ProcessRunner> {
    Arc::new(TokioProcessRunner)
}
