//! `status` command: read-only report on the working directory

use anyhow::Result;

use crate::app::AppConfig;
use crate::resume::StatusReport;

pub async fn run_status_command(app: &AppConfig) -> Result<()> {
    let artifacts = app.recovery.artifact_store(&app.working_dir);
    let report = StatusReport::gather(&app.working_dir, &artifacts).await;
    for line in report.render() {
        println!("{}", line);
    }
    Ok(())
}
