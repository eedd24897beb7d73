//! Daemon Configuration
//!
//! Configuration management for the notification daemon.

use anyhow::{Context, Result};
use notification_assembler::{AssemblyLimits, RenderConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Batch assembly limits
    #[serde(default)]
    pub assembly: AssemblyLimits,

    /// Notification text rendering
    #[serde(default)]
    pub render: RenderConfig,

    /// Where assembled notifications go
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format for posted notifications
    #[serde(default)]
    pub format: OutputFormat,

    /// Channel capacity between input reader and pipeline
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

/// Output format (serialization wrapper)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON array of notification groups per line on stdout
    #[default]
    Json,
    /// Rendered notification text through the log
    Rendered,
}

fn default_queue_depth() -> usize {
    16
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            queue_depth: default_queue_depth(),
        }
    }
}

impl Config {
    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("notification-assembler")
            .join("daemon.toml")
    }

    /// Load configuration from file, creating default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.output.queue_depth == 0 {
            anyhow::bail!("output.queue_depth must be at least 1");
        }
        self.render.validate().context("Invalid [render] section")?;
        Ok(())
    }
}
