use tracing::{debug, info, warn};

use crate::config::{TranslateConfig, DEFAULT_BATCH_SIZE, DEFAULT_SEPARATOR};
use crate::error::{Result, SubterfugeError};
use crate::progress::ProgressReporter;
use crate::subtitle::{format_cues, parse_cues, strip_markup, Cue};
use super::{Translation, Translator};

/// Tunables for batched translation
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Cues per remote call
    pub batch_size: usize,
    /// Joins cue texts in a batch payload and re-splits the reply
    pub separator: String,
    /// Remove `<...>` tags before sending
    pub strip_markup: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            separator: DEFAULT_SEPARATOR.to_string(),
            strip_markup: true,
        }
    }
}

impl From<&TranslateConfig> for BatchOptions {
    fn from(config: &TranslateConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            separator: config.separator.clone(),
            strip_markup: config.strip_markup,
        }
    }
}

/// Translated cues, aligned one-to-one with the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedDocument {
    pub cues: Vec<Cue>,
    /// Source language reported by the first successful call, if any
    pub detected_language: Option<String>,
}

impl TranslatedDocument {
    pub fn render(&self) -> String {
        format_cues(&self.cues)
    }
}

/// Records the detected language of the first successful call only
#[derive(Debug, Default)]
struct FirstCall {
    seen: bool,
    detected_language: Option<String>,
}

impl FirstCall {
    fn observe(&mut self, translation: &Translation) {
        if !self.seen {
            self.seen = true;
            self.detected_language = translation.detected_language.clone();
        }
    }
}

/// Drives batch translation of a cue sequence.
///
/// Batches run strictly in document order. A batch whose reply does not
/// split back into exactly one fragment per cue, or whose request is
/// rejected as too large, is retried cue by cue.
pub struct BatchCoordinator {
    translator: Box<dyn Translator>,
    options: BatchOptions,
}

impl BatchCoordinator {
    pub fn new(translator: Box<dyn Translator>, options: BatchOptions) -> Result<Self> {
        if options.batch_size == 0 {
            return Err(SubterfugeError::Config("batch size must be at least 1".to_string()));
        }
        if options.separator.is_empty() {
            return Err(SubterfugeError::Config("separator must not be empty".to_string()));
        }
        Ok(Self { translator, options })
    }

    /// Parse, translate and re-render a whole SRT document
    pub async fn translate_text(
        &self,
        content: &str,
        from: &str,
        to: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<TranslatedDocument> {
        let cues = parse_cues(content);
        self.translate_document(&cues, from, to, progress).await
    }

    /// Translate every cue, keeping `output[i]` aligned with `cues[i]`
    pub async fn translate_document(
        &self,
        cues: &[Cue],
        from: &str,
        to: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<TranslatedDocument> {
        if cues.is_empty() {
            return Err(SubterfugeError::NoEntries);
        }

        let total = cues.len();
        let batch_size = self.options.batch_size;
        info!(
            "Translating {} cues from {} to {} in {} batches",
            total,
            from,
            to,
            total.div_ceil(batch_size)
        );

        let mut output = cues.to_vec();
        let mut first_call = FirstCall::default();

        for (batch_number, batch) in cues.chunks(batch_size).enumerate() {
            let start = batch_number * batch_size;
            let texts: Vec<String> = batch.iter().map(|cue| self.prepare_text(&cue.text)).collect();
            let payload = texts.join(&self.options.separator);

            debug!("Batch {} covers cues {}..{}", batch_number + 1, start + 1, start + batch.len());

            match self.translator.translate(&payload, from, to).await {
                Ok(translation) => {
                    first_call.observe(&translation);

                    match self.split_reply(&translation.text, batch.len()) {
                        Some(fragments) => {
                            for (slot, fragment) in output[start..start + batch.len()].iter_mut().zip(fragments) {
                                slot.text = fragment;
                            }
                        }
                        None => {
                            warn!(
                                "Batch starting at {} came back misaligned, translating its {} cues individually",
                                start + 1,
                                batch.len()
                            );
                            self.translate_individually(&texts, start, from, to, &mut output, &mut first_call)
                                .await?;
                        }
                    }
                }
                Err(e) if e.is_payload_too_large() => {
                    warn!(
                        "Batch starting at {} too large, translating its {} cues individually",
                        start + 1,
                        batch.len()
                    );
                    self.translate_individually(&texts, start, from, to, &mut output, &mut first_call)
                        .await?;
                }
                Err(e) => {
                    return Err(SubterfugeError::BatchFailed {
                        start: start + 1,
                        source: Box::new(e),
                    });
                }
            }

            progress.report(start + batch.len(), total);
        }

        progress.finish();

        Ok(TranslatedDocument {
            cues: output,
            detected_language: first_call.detected_language,
        })
    }

    fn prepare_text(&self, text: &str) -> String {
        if self.options.strip_markup {
            strip_markup(text)
        } else {
            text.to_string()
        }
    }

    /// Split a batch reply, or `None` when the fragment count differs
    fn split_reply(&self, reply: &str, expected: usize) -> Option<Vec<String>> {
        let fragments: Vec<String> = reply
            .split(self.options.separator.as_str())
            .map(|fragment| fragment.trim().to_string())
            .collect();

        if fragments.len() == expected {
            Some(fragments)
        } else {
            debug!("Expected {} fragments, reply split into {}", expected, fragments.len());
            None
        }
    }

    async fn translate_individually(
        &self,
        texts: &[String],
        start: usize,
        from: &str,
        to: &str,
        output: &mut [Cue],
        first_call: &mut FirstCall,
    ) -> Result<()> {
        for (offset, text) in texts.iter().enumerate() {
            let position = start + offset;
            let translation = self
                .translator
                .translate(text, from, to)
                .await
                .map_err(|e| SubterfugeError::EntryFailed {
                    index: position + 1,
                    source: Box::new(e),
                })?;

            first_call.observe(&translation);
            output[position].text = translation.text.trim().to_string();
        }
        Ok(())
    }
}
