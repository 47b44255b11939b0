use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::MediaConfig;
use crate::error::{Result, SubterfugeError};
use super::{MediaCommandBuilder, SubtitleCodec, SubtitleExtractor};

/// Extractor backed by ffprobe + ffmpeg
pub struct FfmpegExtractor {
    command_builder: MediaCommandBuilder,
}

impl FfmpegExtractor {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            command_builder: MediaCommandBuilder::new(config.ffmpeg_path, config.ffprobe_path),
        }
    }
}

/// `<dir>/<stem><ext>` for a video path
pub fn extracted_path(video_path: &Path, codec: SubtitleCodec) -> Result<PathBuf> {
    let stem = video_path
        .file_stem()
        .ok_or_else(|| SubterfugeError::Config(format!("Invalid video filename: {}", video_path.display())))?
        .to_string_lossy();
    let dir = video_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(format!("{}{}", stem, codec.extension())))
}

#[async_trait]
impl SubtitleExtractor for FfmpegExtractor {
    async fn probe_codec(&self, video_path: &Path, track: usize) -> Result<String> {
        self.command_builder
            .probe_subtitle_codec(video_path, track)
            .execute_capture()
            .await
            .map_err(|e| SubterfugeError::Media(format!("Failed to get subtitle codec: {}", e)))
    }

    async fn extract(&self, video_path: &Path, track: usize) -> Result<PathBuf> {
        if !video_path.exists() {
            return Err(SubterfugeError::FileNotFound(video_path.display().to_string()));
        }

        let codec_name = self.probe_codec(video_path, track).await?;
        let codec = SubtitleCodec::from_name(&codec_name)?;
        let output_path = extracted_path(video_path, codec)?;

        if output_path.exists() {
            return Err(SubterfugeError::DestinationExists(output_path.display().to_string()));
        }

        let command = match codec {
            SubtitleCodec::Text => self.command_builder.extract_as_srt(video_path, track, output_path.as_path()),
            SubtitleCodec::Pgs => self.command_builder.extract_copy(video_path, track, output_path.as_path()),
        };

        info!(
            "Extracting track {} with codec {} to {}",
            track,
            codec_name,
            output_path.display()
        );
        command.execute().await?;

        Ok(output_path)
    }

    async fn check_availability(&self) -> Result<()> {
        for command in [
            self.command_builder.version_check(),
            self.command_builder.probe_version_check(),
        ] {
            let version = command.execute_capture().await?;
            info!(
                "Media tool is available: {}",
                version.lines().next().unwrap_or("unknown version")
            );
        }
        Ok(())
    }
}
