use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{Result, SubterfugeError};
use super::{Translator, Translation, AUTO_DETECT};

/// Client for the public `translate_a/single` endpoint (`client=gtx`)
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<Translation> {
        debug!("Sending {} bytes for translation {} -> {}", text.len(), from, to);

        let response = self.client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", from),
                ("tl", to),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SubterfugeError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        decode_reply(&body, from == AUTO_DETECT)
    }
}

/// Decode the nested-array reply.
///
/// Element 0 holds chunks whose first slot is a text fragment; element 2
/// is the detected source language. Chunks that are null or not shaped
/// like `[string, ...]` are skipped.
pub fn decode_reply(body: &str, auto_detect: bool) -> Result<Translation> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SubterfugeError::UnexpectedReply(format!("reply is not JSON: {}", e)))?;

    let top = value
        .as_array()
        .ok_or_else(|| SubterfugeError::UnexpectedReply("reply is not an array".to_string()))?;

    let chunks = top
        .first()
        .ok_or_else(|| SubterfugeError::UnexpectedReply("empty translation result".to_string()))?
        .as_array()
        .ok_or_else(|| SubterfugeError::UnexpectedReply("unexpected translation format".to_string()))?;

    let text: String = chunks
        .iter()
        .filter_map(|chunk| chunk.as_array()?.first()?.as_str())
        .collect();

    let detected_language = if auto_detect {
        top.get(2)
            .and_then(Value::as_str)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    } else {
        None
    };

    Ok(Translation {
        text,
        detected_language,
    })
}
