//! Command-line interface of the recovery tool

pub mod args;
pub mod commands;
pub mod progress;
pub mod router;

pub use args::{Cli, Commands, RetryArgs, StatusArgs};
pub use router::execute_command;
