//! Stale-output cleaner
//!
//! Removes chapter files and transient ffmpeg inputs left by an interrupted
//! run. Every removal is best effort: failures are logged and collected, never
//! raised. Running it twice leaves the same directory as running it once.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::RecoveryError;

/// Glob patterns for transient files in the working directory
pub const TRANSIENT_PATTERNS: &[&str] = &["chapter_list_*.txt", "*.temp.*", "*.concat_list.txt"];

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<RecoveryError>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Remove partial chapter files and transient artifacts from `working_dir`
pub fn clean_stale_outputs(working_dir: &Path, group_files: &[String]) -> CleanupReport {
    let mut report = CleanupReport::default();

    for group in group_files {
        remove_if_present(&working_dir.join(group), &mut report);
    }

    let base = glob::Pattern::escape(&working_dir.to_string_lossy());
    for pattern in TRANSIENT_PATTERNS {
        let full = format!("{}/{}", base, pattern);
        let paths = match glob::glob(&full) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Skipping cleanup pattern {}: {}", pattern, e);
                continue;
            }
        };
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => remove_if_present(&path, &mut report),
                Ok(_) => {}
                Err(e) => warn!("Could not inspect {}: {}", e.path().display(), e.error()),
            }
        }
    }

    if report.removed.is_empty() {
        debug!("No stale outputs in {}", working_dir.display());
    } else {
        info!(
            "Cleaned up {} stale files in {}",
            report.removed.len(),
            working_dir.display()
        );
    }
    report
}

fn remove_if_present(path: &Path, report: &mut CleanupReport) {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale file: {}", path.display());
            report.removed.push(path.to_path_buf());
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            let failure = RecoveryError::CleanupFailure {
                path: path.to_path_buf(),
                source,
            };
            warn!("{}", failure);
            report.failures.push(failure);
        }
    }
}
