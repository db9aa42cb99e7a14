//! Resume support: segment validation, stale-output cleanup and the resume
//! decision, plus the entry point that falls back to full generation.

pub mod cleanup;
pub mod controller;
pub mod entry;
pub mod messages;
pub mod sanitize;
pub mod status;
pub mod validator;

pub use cleanup::{clean_stale_outputs, CleanupReport, TRANSIENT_PATTERNS};
pub use controller::{ResumeController, ResumeDecision};
pub use entry::{
    run_with_recovery, FullGeneration, GeneratedBook, GenerationRequest, RunOutcome, RunPath,
};
pub use sanitize::sanitize_group_name;
pub use status::{CheckpointStatus, StatusReport};
pub use validator::{find_missing, validate_segments, SegmentReport};
