//! Command routing and execution

use anyhow::Result;

use crate::app::AppConfig;
use crate::cli::args::{Cli, Commands};
use crate::cli::commands::{run_retry_command, run_status_command};

/// Execute a CLI command; no subcommand means `retry`
pub async fn execute_command(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;
    match cli.command {
        Some(Commands::Retry(args)) => {
            let app = app_config(verbose, &args.working_dir)?;
            run_retry_command(args, &app).await
        }
        Some(Commands::Status(args)) => {
            let app = app_config(verbose, &args.working_dir)?;
            run_status_command(&app).await
        }
        None => {
            let app = app_config(verbose, &cli.retry.working_dir)?;
            run_retry_command(cli.retry, &app).await
        }
    }
}

fn app_config(verbose: u8, working_dir: &std::path::Path) -> Result<AppConfig> {
    AppConfig::new(verbose)
        .with_working_dir(working_dir.to_path_buf())
        .load_recovery_config()
}
