use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SubterfugeError};

/// External media tool invocation (ffmpeg / ffprobe)
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Select the nth subtitle stream of the first input
    pub fn map_subtitle(self, track: usize) -> Self {
        self.arg("-map").arg(format!("0:s:{}", track))
    }

    /// Set subtitle codec
    pub fn subtitle_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:s").arg(codec)
    }

    /// Execute the command, discarding its output
    pub async fn execute(&self) -> Result<()> {
        self.run().await.map(|_| ())
    }

    /// Execute the command and return trimmed stdout
    pub async fn execute_capture(&self) -> Result<String> {
        self.run().await
    }

    async fn run(&self) -> Result<String> {
        debug!("Executing media command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| SubterfugeError::Media(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubterfugeError::Media(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Builder for the ffprobe / ffmpeg invocations used by extraction
pub struct MediaCommandBuilder {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S1: Into<String>, S2: Into<String>>(ffmpeg_path: S1, ffprobe_path: S2) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Print the codec name of one subtitle stream and nothing else
    pub fn probe_subtitle_codec<P: AsRef<Path>>(&self, video_path: P, track: usize) -> MediaCommand {
        MediaCommand::new(&self.ffprobe_path, "Subtitle codec probe")
            .args(["-v", "error", "-select_streams"])
            .arg(format!("s:{}", track))
            .args(["-show_entries", "stream=codec_name"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .output(video_path)
    }

    /// Convert a text subtitle stream to SRT
    pub fn extract_as_srt<P: AsRef<Path>>(&self, video_path: P, track: usize, output_path: P) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, "Subtitle extraction")
            .input(video_path)
            .map_subtitle(track)
            .subtitle_codec("srt")
            .output(output_path)
    }

    /// Copy a subtitle stream without re-encoding
    pub fn extract_copy<P: AsRef<Path>>(&self, video_path: P, track: usize, output_path: P) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, "Subtitle extraction")
            .input(video_path)
            .map_subtitle(track)
            .subtitle_codec("copy")
            .output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, "Version check")
            .arg("-version")
    }

    /// Build version check command for ffprobe
    pub fn probe_version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.ffprobe_path, "Probe version check")
            .arg("-version")
    }
}
