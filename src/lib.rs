//! # audiobook-recovery
//!
//! Checkpoint-and-resume controller for an audiobook pipeline. Line
//! generation is slow, so once it has produced every per-line audio segment
//! the chapter structure is persisted; an interrupted or failed run can then
//! resume from chapter assembly without regenerating any line.
//!
//! ## Modules
//!
//! - `artifacts` - Presence checks for per-line segments on disk
//! - `checkpoint` - Typed recovery checkpoint and its atomic store
//! - `resume` - Segment validation, stale-output cleanup and the resume decision
//! - `pipeline` - Assembling, post-processing, converting and final merge
//! - `media` - The media operation interface and its ffmpeg implementation
//! - `subprocess` - Process runner abstraction with a scriptable mock
//! - `config` - `recovery.toml` and environment configuration
//! - `cli` / `app` - The `audiobook-recovery` binary
pub mod app;
pub mod artifacts;
pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod resume;
pub mod subprocess;

pub use error::{RecoveryError, Result};
