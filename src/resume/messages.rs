//! Pure formatting of user-facing resume messages

use std::path::Path;

use crate::checkpoint::Checkpoint;
use crate::error::RecoveryError;

/// Lines printed once a checkpoint has been accepted
pub fn format_resume_summary(checkpoint: &Checkpoint) -> Vec<String> {
    vec![
        "Recovery data found!".to_string(),
        format!("Found {} line segments", checkpoint.total_lines),
        format!("Chapters to assemble: {}", checkpoint.chapter_count()),
    ]
}

/// User message followed by the error's suggestions
pub fn format_error_guidance(error: &RecoveryError) -> Vec<String> {
    let mut lines = vec![error.user_message()];
    let suggestions = error.suggestions();
    match suggestions.len() {
        0 => {}
        1 => lines.push(format!("Hint: {}", suggestions[0])),
        _ => {
            lines.push(String::new());
            lines.push("Troubleshooting tips:".to_string());
            lines.extend(suggestions.iter().map(|tip| format!("   - {}", tip)));
        }
    }
    lines
}

/// Describe what a force cleanup removed
pub fn format_cleanup_summary(removed: usize, failures: usize) -> String {
    match (removed, failures) {
        (0, 0) => "No existing chapter files to remove".to_string(),
        (n, 0) => format!("Removed {} existing chapter files", n),
        (n, f) => format!("Removed {} existing chapter files ({} could not be removed)", n, f),
    }
}

/// Size in megabytes with one decimal, as shown in listings
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Files directly inside `dir` with their sizes, sorted by name
pub fn list_output_files(dir: &Path) -> Vec<(String, u64)> {
    let mut files: Vec<(String, u64)> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                meta.is_file()
                    .then(|| (entry.file_name().to_string_lossy().into_owned(), meta.len()))
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();
    files
}

pub fn format_output_listing(dir: &Path, files: &[(String, u64)]) -> Vec<String> {
    if files.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("Generated files in {}:", dir.display())];
    lines.extend(
        files
            .iter()
            .map(|(name, size)| format!("   {} ({})", name, format_size_mb(*size))),
    );
    lines
}
