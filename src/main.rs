use audiobook_recovery::app::{handle_fatal_error, init_logging, AppConfig};
use audiobook_recovery::cli::{execute_command, Cli};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    init_logging(&AppConfig::new(verbose));

    if let Err(e) = execute_command(cli).await {
        handle_fatal_error(e, verbose);
    }
}
