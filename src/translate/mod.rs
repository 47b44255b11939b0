// Translation architecture
//
// - google: HTTP client for the `translate_a/single` endpoint
// - batch: groups cues into batches, reconciles replies, falls back per cue

pub mod batch;
pub mod google;

use async_trait::async_trait;

pub use batch::{BatchCoordinator, BatchOptions, TranslatedDocument};
pub use google::GoogleTranslator;

use crate::error::Result;

/// Source language value asking the service to detect the language
pub const AUTO_DETECT: &str = "auto";

/// Result of one remote translation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// Translated text, fragments concatenated in reply order
    pub text: String,
    /// Source language reported by the service; only set when the call asked for auto-detection
    pub detected_language: Option<String>,
}

impl Translation {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            detected_language: None,
        }
    }

    pub fn with_detected_language<S: Into<String>>(mut self, language: S) -> Self {
        self.detected_language = Some(language.into());
        self
    }
}

/// One remote call per payload. Implementations neither batch nor retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<Translation>;
}
