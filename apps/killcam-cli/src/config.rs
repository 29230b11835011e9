//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/killcam/cli.toml`
//! - Windows: `%APPDATA%/killcam/cli.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use killcam_transfer::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MUSIC_SHARE, DEFAULT_RETRY_DELAYS,
    RetryPolicy,
};
use killcam_uploader::{DEFAULT_BASE_URL, UploadOptions};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `base_url`.
pub const API_URL_ENV: &str = "KILLCAM_API_URL";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Root URL of the clip-processing service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upload chunk size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Share of the progress bar given to music, in percent.
    #[serde(default = "default_music_share")]
    pub music_share_percent: u8,

    /// Attempts per chunk (and per finalize call), first try included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait before each retry, in seconds.
    #[serde(default = "default_retry_delays")]
    pub retry_delays_secs: Vec<u64>,

    /// Refresh period for `videos --watch`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

fn default_music_share() -> u8 {
    DEFAULT_MUSIC_SHARE
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_delays() -> Vec<u64> {
    DEFAULT_RETRY_DELAYS.iter().map(Duration::as_secs).collect()
}

fn default_poll_interval() -> u64 {
    5
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chunk_size: default_chunk_size(),
            music_share_percent: default_music_share(),
            max_attempts: default_max_attempts(),
            retry_delays_secs: default_retry_delays(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `path`, or writes and returns defaults if
    /// the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: CliConfig = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            let config = CliConfig::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Applies the `KILLCAM_API_URL` value, if set and non-empty.
    pub fn with_env_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            self.retry_delays_secs
                .iter()
                .copied()
                .map(Duration::from_secs)
                .collect(),
        )
    }

    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions {
            chunk_size: self.chunk_size.max(1),
            music_share: self.music_share_percent.min(100),
            retry: self.retry_policy(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Returns the platform-specific configuration file path.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    killcam_settings::config_dir()
        .map(|d| d.join("killcam").join("cli.toml"))
        .context("cannot determine the configuration directory (HOME/APPDATA unset)")
}
