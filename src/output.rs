use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{Result, SubterfugeError};

/// Where a translated document ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Write `<name>.<target><ext>` next to the input
    Create,
    /// Overwrite the input when it already carries the source language tag
    Replace,
}

impl OutputMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "replace" => Ok(Self::Replace),
            other => Err(SubterfugeError::Config(format!(
                "Invalid output mode '{}'. Valid options: create, replace",
                other
            ))),
        }
    }
}

/// `pt-BR` -> `pt`
pub fn normalize_language_code(code: &str) -> String {
    code.to_lowercase()
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Split a path into directory, file stem and extension (with dot)
pub fn filename_parts(path: &Path) -> (PathBuf, String, String) {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (dir, stem, ext)
}

/// Drop a trailing language tag: `movie.en` -> `movie`, `show.pt-br` -> `show`
pub fn strip_language_suffix(stem: &str) -> &str {
    match stem.rsplit_once('.') {
        Some((base, tag))
            if !base.is_empty()
                && (2..=5).contains(&tag.len())
                && tag.chars().all(|c| c.is_ascii_alphabetic() || c == '-') =>
        {
            base
        }
        _ => stem,
    }
}

/// `<dir>/<stem>.<lang><ext>` with the language code normalized
pub fn build_subtitle_path(dir: &Path, stem: &str, ext: &str, lang: &str) -> PathBuf {
    dir.join(format!("{}.{}{}", stem, normalize_language_code(lang), ext))
}

/// Rename, falling back to copy + delete across filesystems
pub async fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if let Err(e) = fs::rename(src, dst).await {
        debug!("Rename {} -> {} failed ({}), copying instead", src.display(), dst.display(), e);
        fs::copy(src, dst).await?;
        if let Err(e) = fs::remove_file(src).await {
            warn!("Failed to remove {} after copy: {}", src.display(), e);
        }
    }
    Ok(())
}

/// Place translated content according to `mode`, returning the written path.
///
/// Content goes to a temporary file first; the input file is never
/// modified unless the whole write succeeds.
pub async fn write_translated(
    input: &Path,
    source_lang: &str,
    target_lang: &str,
    mode: OutputMode,
    content: &str,
) -> Result<PathBuf> {
    let (dir, stem, ext) = filename_parts(input);
    let base = strip_language_suffix(&stem);

    let target_path = build_subtitle_path(&dir, base, &ext, target_lang);
    if target_path.exists() {
        return Err(SubterfugeError::DestinationExists(target_path.display().to_string()));
    }

    let temp = tempfile::Builder::new()
        .prefix("subterfuge-")
        .suffix(&ext)
        .tempfile()?
        .into_temp_path();
    fs::write(&temp, content).await?;

    let destination = match mode {
        OutputMode::Create => target_path,
        OutputMode::Replace => {
            let source_path = build_subtitle_path(&dir, base, &ext, source_lang);
            if input == source_path.as_path() {
                input.to_path_buf()
            } else if source_path.exists() {
                return Err(SubterfugeError::DestinationExists(source_path.display().to_string()));
            } else {
                target_path
            }
        }
    };

    move_file(&temp, &destination).await?;
    info!("Translated file saved to {}", destination.display());
    Ok(destination)
}
