// Subtitle track extraction
//
// - commands: ffprobe / ffmpeg command builders
// - processor: ffmpeg-backed extractor

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::{Result, SubterfugeError};

/// Subtitle stream codecs we know how to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleCodec {
    /// subrip, ass, webvtt: converted to SRT
    Text,
    /// hdmv_pgs_subtitle: image based, copied as `.sup`
    Pgs,
}

impl SubtitleCodec {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim() {
            "subrip" | "ass" | "webvtt" => Ok(Self::Text),
            "hdmv_pgs_subtitle" => Ok(Self::Pgs),
            other => Err(SubterfugeError::UnsupportedCodec(other.to_string())),
        }
    }

    /// File extension (with dot) of the extracted file
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => ".srt",
            Self::Pgs => ".sup",
        }
    }
}

/// Extracts subtitle streams from video containers
#[async_trait]
pub trait SubtitleExtractor: Send + Sync {
    /// Codec name of the nth subtitle stream
    async fn probe_codec(&self, video_path: &Path, track: usize) -> Result<String>;

    /// Extract the nth subtitle stream next to the video, returning its path
    async fn extract(&self, video_path: &Path, track: usize) -> Result<PathBuf>;

    /// Check if the external tools are available
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating extractor instances
pub struct SubtitleExtractorFactory;

impl SubtitleExtractorFactory {
    /// Create the default extractor (ffmpeg-based)
    pub fn create_extractor(config: MediaConfig) -> Box<dyn SubtitleExtractor> {
        Box::new(processor::FfmpegExtractor::new(config))
    }
}
