//! Moondream Station adapter
//!
//! Moondream Station exposes `POST {endpoint}/query` taking an image as a data URL
//! and a free-text question. Depending on the station version the answer comes
//! back under different keys, or as a bare string; [`normalize_answer`] folds
//! those shapes into one answer text. Anything else comes back empty.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::media_type::detect_media_type;
use crate::model::{VisionError, VisionModel};

const ANSWER_KEYS: [&str; 4] = ["answer", "response", "text", "content"];
const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    image_url: String,
    question: &'a str,
}

pub struct MoondreamClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    timeout_secs: u64,
}

impl Debug for MoondreamClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MoondreamClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl MoondreamClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for Moondream")?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, err: reqwest::Error) -> VisionError {
        if err.is_timeout() {
            VisionError::Timeout(self.timeout_secs)
        } else if err.is_connect() {
            VisionError::Unavailable(self.endpoint.clone())
        } else {
            VisionError::Request(err.to_string())
        }
    }
}

/// Answer text from a station response body.
///
/// An object without a string under any answer key has no usable answer and
/// yields empty text.
fn normalize_answer(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let answer = ANSWER_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str));
            match answer {
                Some(answer) => answer.to_string(),
                None => {
                    tracing::warn!(
                        keys = ?map.keys().collect::<Vec<_>>(),
                        "Moondream response has no answer text"
                    );
                    String::new()
                }
            }
        }
        Ok(Value::String(answer)) => answer,
        Ok(other) => other.to_string(),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl VisionModel for MoondreamClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn query(&self, image: &[u8], prompt: &str) -> Result<String, VisionError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let body = QueryRequest {
            image_url: format!("data:{};base64,{}", detect_media_type(image), encoded),
            question: prompt,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            image_bytes = image.len(),
            "Querying Moondream"
        );

        let response = self
            .http_client
            .post(format!("{}/query", self.endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VisionError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Ok(normalize_answer(&text))
    }

    async fn ping(&self) -> bool {
        match self
            .http_client
            .get(&self.endpoint)
            .timeout(PING_TIMEOUT)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(
                    endpoint = %self.endpoint,
                    error = %e,
                    "Moondream endpoint unreachable"
                );
                false
            }
        }
    }
}
