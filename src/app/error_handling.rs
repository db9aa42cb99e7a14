//! Error handling utilities
//!
//! Centralized reporting of terminal failures for the binary.

use tracing::error;

use crate::error::RecoveryError;
use crate::resume::messages::format_error_guidance;

/// Print a terminal failure to stderr and return the exit code to use
///
/// A `RecoveryError` anywhere in the chain gets its user message and
/// troubleshooting tips; verbose mode adds the developer message. Any other
/// error prints its chain.
pub fn report_error(error: &anyhow::Error, verbose: u8) -> i32 {
    error!("Fatal error: {:#}", error);

    if let Some(recovery_err) = error.downcast_ref::<RecoveryError>() {
        for line in format_error_guidance(recovery_err) {
            eprintln!("{}", line);
        }

        if verbose >= 1 {
            eprintln!("\nContext Chain:\n{}", recovery_err.developer_message());
        }

        recovery_err.exit_code()
    } else {
        eprintln!("Error: {error}");

        if verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in error.chain().enumerate() {
                eprintln!("  {}: {}", i, cause);
            }
        }

        1
    }
}

/// Report the error and exit the process
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    let exit_code = report_error(&error, verbose);
    std::process::exit(exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_through_context() {
        let result: Result<(), RecoveryError> = Err(RecoveryError::NoCheckpoint {
            working_dir: PathBuf::from("temp_audio"),
        });
        let err = result.context("Checking for recovery data").unwrap_err();
        assert_eq!(report_error(&err, 0), 1);
    }

    #[test]
    fn test_plain_error_exit_code() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(report_error(&err, 1), 1);
    }
}
