//! Recovery configuration
//!
//! Defaults, then `<working_dir>/recovery.toml` when present, then
//! `AUDIOBOOK_RECOVERY_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::artifacts::{ArtifactStore, DEFAULT_LINE_EXTENSION, DEFAULT_LINE_SEGMENTS_DIR};
use crate::error::{RecoveryError, Result};

/// Name of the optional configuration file inside the working directory
pub const CONFIG_FILE_NAME: &str = "recovery.toml";

pub const ENV_PREFIX: &str = "AUDIOBOOK_RECOVERY_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecoveryConfig {
    /// Line segment directory, relative to the working directory
    pub line_segments_dir: PathBuf,
    pub line_extension: String,
    /// Where the merged audiobook is written
    pub output_dir: PathBuf,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Per-command timeout for ffmpeg/ffprobe; none waits indefinitely
    pub command_timeout_secs: Option<u64>,
    pub audio_bitrate: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            line_segments_dir: PathBuf::from(DEFAULT_LINE_SEGMENTS_DIR),
            line_extension: DEFAULT_LINE_EXTENSION.to_string(),
            output_dir: PathBuf::from("generated_audiobooks"),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            command_timeout_secs: None,
            audio_bitrate: "256k".to_string(),
        }
    }
}

impl RecoveryConfig {
    /// Load configuration for a working directory, including env overrides
    pub fn load(working_dir: &Path) -> Result<Self> {
        let mut config = Self::from_file(&working_dir.join(CONFIG_FILE_NAME))?;
        config.merge_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            RecoveryError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            RecoveryError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `AUDIOBOOK_RECOVERY_*` overrides read through `lookup`
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("LINE_SEGMENTS_DIR") {
            self.line_segments_dir = PathBuf::from(value);
        }
        if let Some(value) = var("LINE_EXTENSION") {
            self.line_extension = value;
        }
        if let Some(value) = var("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(value);
        }
        if let Some(value) = var("FFMPEG") {
            self.ffmpeg_path = value;
        }
        if let Some(value) = var("FFPROBE") {
            self.ffprobe_path = value;
        }
        if let Some(value) = var("AUDIO_BITRATE") {
            self.audio_bitrate = value;
        }
        if let Some(value) = var("COMMAND_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|_| {
                RecoveryError::config(format!(
                    "{ENV_PREFIX}COMMAND_TIMEOUT_SECS must be a whole number of seconds, got `{value}`"
                ))
            })?;
            self.command_timeout_secs = Some(secs);
        }

        Ok(())
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    pub fn unit_dir(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.line_segments_dir)
    }

    pub fn artifact_store(&self, working_dir: &Path) -> ArtifactStore {
        ArtifactStore::new(self.unit_dir(working_dir)).with_extension(self.line_extension.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RecoveryConfig::default();
        assert_eq!(config.line_segments_dir, PathBuf::from("line_segments"));
        assert_eq!(config.line_extension, "wav");
        assert_eq!(config.output_dir, PathBuf::from("generated_audiobooks"));
        assert_eq!(config.command_timeout(), None);
        assert_eq!(
            config.unit_dir(Path::new("temp_audio")),
            PathBuf::from("temp_audio/line_segments")
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = RecoveryConfig::from_file(&temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, RecoveryConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "ffmpeg_path = \"/opt/ffmpeg/bin/ffmpeg\"\ncommand_timeout_secs = 600\n")
            .unwrap();

        let config = RecoveryConfig::from_file(&path).unwrap();
        assert_eq!(config.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.audio_bitrate, "256k");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "silence_ms = 500\n").unwrap();

        let err = RecoveryConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, RecoveryError::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AUDIOBOOK_RECOVERY_FFMPEG", "/usr/local/bin/ffmpeg"),
            ("AUDIOBOOK_RECOVERY_LINE_EXTENSION", "flac"),
            ("AUDIOBOOK_RECOVERY_COMMAND_TIMEOUT_SECS", "30"),
        ]
        .into_iter()
        .collect();

        let mut config = RecoveryConfig::default();
        config
            .merge_env_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.ffmpeg_path, "/usr/local/bin/ffmpeg");
        assert_eq!(config.line_extension, "flac");
        assert_eq!(config.command_timeout_secs, Some(30));
        assert_eq!(config.ffprobe_path, "ffprobe");
    }

    #[test]
    fn test_env_timeout_must_be_numeric() {
        let mut config = RecoveryConfig::default();
        let err = config
            .merge_env_with(|key| {
                (key == "AUDIOBOOK_RECOVERY_COMMAND_TIMEOUT_SECS").then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(err.to_string().contains("COMMAND_TIMEOUT_SECS"));
    }
}
