use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub session: SessionConfig,
    pub restart: RestartConfig,
    pub api: ApiConfig,
}

/// Speech engine settings. The engine itself is external; these are handed
/// to it at start and logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub model: String,
    pub language: String,
    /// Length of the rolling realtime transcription window
    pub realtime_audio_sec: u32,
    /// Slice length the engine transcribes per pass
    pub realtime_slice_sec: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Start listening as soon as a presentation session starts
    pub auto_listen: bool,
    /// Delay between completion and the automatic engine stop
    pub auto_stop_delay_ms: u64,
}

/// Bounded restart policy applied when the engine stops on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "tiny".to_string(),
            language: "fr".to_string(),
            realtime_audio_sec: 120,
            realtime_slice_sec: 25,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_listen: true,
            auto_stop_delay_ms: 1000,
        }
    }
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3838 }
    }
}

impl SessionConfig {
    pub fn auto_stop_delay(&self) -> Duration {
        Duration::from_millis(self.auto_stop_delay_ms)
    }
}

impl RestartConfig {
    /// Backoff before restart attempt `attempt` (1-based), doubling from the
    /// initial value and capped at `max_backoff_ms`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let millis = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

/// Whisper model sizes the engine can be configured with.
pub const SUPPORTED_MODELS: &[&str] = &["tiny", "base", "small", "medium"];

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn set_model(&mut self, model: &str) -> Result<()> {
        let model = model.trim().to_lowercase();
        if !SUPPORTED_MODELS.contains(&model.as_str()) {
            anyhow::bail!(
                "Unknown model '{}'. Supported models: {}",
                model,
                SUPPORTED_MODELS.join(", ")
            );
        }
        self.engine.model = model;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
