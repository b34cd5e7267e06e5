use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub transcription: TranscriptionConfig,
    pub capture: CaptureConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the meeting backend that stores recordings,
    /// transcripts and summaries.
    pub base_url: String,
    /// Optional bearer token sent with every backend request.
    pub auth_token: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// AssemblyAI API key. Transcription fails without one.
    pub api_key: String,
    pub base_url: String,
    /// Seconds between job status checks.
    pub poll_interval_seconds: u64,
    /// Status checks before the job is considered timed out.
    pub max_poll_attempts: u32,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.assemblyai.com/v2".to_string(),
            poll_interval_seconds: 5,
            max_poll_attempts: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Sample rate the mixed recording is resampled to before encoding.
    pub target_sample_rate: u32,
    /// Sample rate capture feeds are expected to deliver.
    pub source_sample_rate: u32,
    /// Where finalized recordings are written. Defaults to the data dir.
    pub recordings_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000,
            source_sample_rate: 48000,
            recordings_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3990 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn recordings_dir(&self) -> Result<PathBuf> {
        match &self.capture.recordings_dir {
            Some(dir) => Ok(dir.clone()),
            None => global::recordings_dir(),
        }
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
