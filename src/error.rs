use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubterfugeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Unexpected reply format: {0}")]
    UnexpectedReply(String),

    #[error("No entries found in subtitle document")]
    NoEntries,

    #[error("Translation failed at batch starting at {start}: {source}")]
    BatchFailed {
        start: usize,
        #[source]
        source: Box<SubterfugeError>,
    },

    #[error("Translation failed at entry {index}: {source}")]
    EntryFailed {
        index: usize,
        #[source]
        source: Box<SubterfugeError>,
    },

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Unsupported subtitle codec: {0}")]
    UnsupportedCodec(String),

    #[error("Destination file already exists: {0}")]
    DestinationExists(String),

    #[error("Source language ({source_lang}) is the same as target language ({target_lang})")]
    SameLanguage {
        source_lang: String,
        target_lang: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl SubterfugeError {
    /// True when the remote service rejected the request as too large (HTTP 413).
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self, Self::Status { code: 413, .. })
    }
}

pub type Result<T> = std::result::Result<T, SubterfugeError>;
