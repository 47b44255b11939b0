use std::path::Path;
use std::sync::OnceLock;
use regex::Regex;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Result, SubterfugeError};

/// One timed subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Declared ordinal, carried through unchanged
    pub index: u32,
    /// Timecode line, e.g. `00:00:01,000 --> 00:00:02,000`
    pub timing: String,
    /// One or more lines joined by `\n`
    pub text: String,
}

impl Cue {
    pub fn new<S1: Into<String>, S2: Into<String>>(index: u32, timing: S1, text: S2) -> Self {
        Self {
            index,
            timing: timing.into(),
            text: text.into(),
        }
    }

    /// Same ordinal and timing, different text
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        Self {
            index: self.index,
            timing: self.timing.clone(),
            text: text.into(),
        }
    }
}

fn block_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\n+").expect("block separator pattern is valid"))
}

fn markup_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"))
}

/// Parse an SRT document into cues.
///
/// Blocks with fewer than three lines or a non-numeric first line are
/// skipped. An empty result is not an error here; callers decide.
pub fn parse_cues(content: &str) -> Vec<Cue> {
    let normalized = content.replace("\r\n", "\n");
    let mut cues = Vec::new();

    for block in block_separator().split(normalized.trim()) {
        let lines: Vec<&str> = block.trim().split('\n').collect();
        if lines.len() < 3 {
            continue;
        }

        let index = match lines[0].trim().parse::<u32>() {
            Ok(index) => index,
            Err(_) => {
                debug!("Skipping block with invalid ordinal: {:?}", lines[0]);
                continue;
            }
        };

        cues.push(Cue {
            index,
            timing: lines[1].trim().to_string(),
            text: lines[2..].join("\n"),
        });
    }

    cues
}

/// Render cues back into an SRT document, one blank line between cues
pub fn format_cues(cues: &[Cue]) -> String {
    cues.iter()
        .map(|cue| format!("{}\n{}\n{}", cue.index, cue.timing, cue.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Remove `<...>` tags such as `<i>` or `<font color="red">`
pub fn strip_markup(text: &str) -> String {
    markup_tag().replace_all(text, "").into_owned()
}

/// Read and parse an SRT file, failing when no cue survives parsing
pub async fn read_srt<P: AsRef<Path>>(path: P) -> Result<Vec<Cue>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SubterfugeError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).await?;
    let cues = parse_cues(&content);
    if cues.is_empty() {
        return Err(SubterfugeError::NoEntries);
    }

    info!("Read {} cues from {}", cues.len(), path.display());
    Ok(cues)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CUES: &str =
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld";

    #[test]
    fn test_parse_two_cues() {
        let cues = parse_cues(TWO_CUES);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].timing, "00:00:01,000 --> 00:00:02,000");
        assert_eq!(cues[0].text, "Hello");
        assert_eq!(cues[1].index, 2);
        assert_eq!(cues[1].text, "World");
    }

    #[test]
    fn test_round_trip() {
        assert_eq!(format_cues(&parse_cues(TWO_CUES)), TWO_CUES);

        let multiline = "7\n00:01:00,000 --> 00:01:02,500\n<i>First line</i>\nSecond line\n\n9\n00:01:03,000 --> 00:01:04,000\nLast";
        assert_eq!(format_cues(&parse_cues(multiline)), multiline);
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nKept\n\n\
                       x\n00:00:03,000 --> 00:00:04,000\nBad ordinal\n\n\
                       3\n00:00:05,000 --> 00:00:06,000\n\n\n\
                       4\n00:00:07,000 --> 00:00:08,000\nAlso kept";
        let cues = parse_cues(content);
        let indices: Vec<u32> = cues.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 4]);
        assert_eq!(cues[1].text, "Also kept");
    }

    #[test]
    fn test_extra_blank_lines_and_crlf() {
        let content = "\r\n1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nWorld\r\n\r\n";
        let cues = parse_cues(content);
        assert_eq!(cues.len(), 2);
        assert_eq!(format_cues(&cues), TWO_CUES);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_cues("").is_empty());
        assert!(parse_cues("\n\n  \n").is_empty());
        assert_eq!(format_cues(&[]), "");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<i>Hello</i> there"), "Hello there");
        assert_eq!(strip_markup("<font color=\"#ff0000\">Red</font>"), "Red");
        assert_eq!(strip_markup("<b></b>"), "");
        assert_eq!(strip_markup("3 < 4"), "3 < 4");
    }

    #[tokio::test]
    async fn test_read_srt_without_cues() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.srt");
        std::fs::write(&path, "not a subtitle").unwrap();

        let err = read_srt(&path).await.unwrap_err();
        assert!(matches!(err, SubterfugeError::NoEntries));

        let missing = read_srt(dir.path().join("missing.srt")).await.unwrap_err();
        assert!(matches!(missing, SubterfugeError::FileNotFound(_)));
    }
}
