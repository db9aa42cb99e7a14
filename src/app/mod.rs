//! Application module
//!
//! Process-level concerns of the binary: logging setup, working directory
//! resolution and fatal error reporting.

pub mod config;
pub mod error_handling;
pub mod logging;

pub use config::AppConfig;
pub use error_handling::{handle_fatal_error, report_error};
pub use logging::init_logging;
