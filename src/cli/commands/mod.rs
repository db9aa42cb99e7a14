//! Command implementation modules

pub mod retry;
pub mod status;

pub use retry::run_retry_command;
pub use status::run_status_command;
