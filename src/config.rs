use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, SubterfugeError};

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_SEPARATOR: &str = "\n###SUBTITLE_SEPARATOR###\n";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_strip_markup() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Number of cues sent per remote call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Token joining cue texts inside one batch payload
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Remove `<...>` tags from cue text before sending
    #[serde(default = "default_strip_markup")]
    pub strip_markup: bool,
    /// Deadline for each outbound call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    /// Path to ffprobe binary
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            separator: default_separator(),
            strip_markup: default_strip_markup(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubterfugeError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| SubterfugeError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubterfugeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubterfugeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.translate.batch_size == 0 {
            return Err(SubterfugeError::Config("translate.batch_size must be at least 1".to_string()));
        }
        if self.translate.separator.is_empty() {
            return Err(SubterfugeError::Config("translate.separator must not be empty".to_string()));
        }
        Ok(())
    }
}
