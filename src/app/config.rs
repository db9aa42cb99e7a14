//! Application configuration

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::RecoveryConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Working directory holding the checkpoint and line segments
    pub working_dir: PathBuf,
    pub recovery: RecoveryConfig,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Load `recovery.toml` and env overrides for the working directory
    pub fn load_recovery_config(mut self) -> Result<Self> {
        self.recovery = RecoveryConfig::load(&self.working_dir)
            .with_context(|| format!("Loading configuration for {}", self.working_dir.display()))?;
        Ok(self)
    }

    /// Get the log filter based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            working_dir: PathBuf::from("temp_audio"),
            recovery: RecoveryConfig::default(),
        }
    }
}
