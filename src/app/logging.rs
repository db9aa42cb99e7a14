//! Logging configuration and initialization

use crate::app::config::AppConfig;
use tracing::{debug, trace};

/// Initialize tracing for the binary
///
/// `RUST_LOG` is ignored; verbosity comes from the `-v` count only.
pub fn init_logging(config: &AppConfig) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(config.log_level())
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(config.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(config.verbose >= 3) // Show line numbers for -vvv
        .try_init();

    if result.is_ok() {
        debug!(
            "audiobook-recovery started with verbosity level: {}",
            config.verbose
        );
        trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
    }
}
