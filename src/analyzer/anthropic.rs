//! Food analysis through the Anthropic Messages API.
//!
//! One request per photo: the JPEG goes inline as base64 together with
//! [`ANALYSIS_PROMPT`], and the first text block of the reply is parsed by
//! [`parse_reply`]. There is no automatic retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{parse_reply, AnalysisOutcome, FoodAnalyzer, ANALYSIS_PROMPT};
use crate::capture::CapturedImage;
use crate::config::Config;
use crate::error::{Result, TrackerError};

/// API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Upper bound on reply length; the expected JSON is tiny.
const MAX_TOKENS: u32 = 1000;

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImagePayload },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImagePayload {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ============================================================================
// Analyzer
// ============================================================================

/// Vision analyzer backed by an Anthropic model.
pub struct AnthropicAnalyzer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicAnalyzer {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Config(format!("could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build an analyzer from loaded configuration.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
            TrackerError::Config(
                "ANTHROPIC_API_KEY is not set; photo analysis is unavailable".to_string(),
            )
        })?;

        Self::new(
            api_key,
            config.analyzer_model.clone(),
            config.analyzer_url.clone(),
            config.analyzer_timeout,
        )
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request<'a>(&'a self, image: &CapturedImage) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImagePayload {
                            kind: "base64",
                            media_type: "image/jpeg",
                            data: image.to_base64(),
                        },
                    },
                    ContentBlock::Text {
                        text: ANALYSIS_PROMPT,
                    },
                ],
            }],
        }
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> TrackerError {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(err) => TrackerError::analysis(format!("API error ({}): {}", status, err.error.message)),
            Err(_) => TrackerError::analysis(format!(
                "API error ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )),
        }
    }
}

/// First text block of a Messages API reply.
fn reply_text(body: &str) -> Result<String> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| TrackerError::analysis(format!("unexpected API response: {}", e)))?;

    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| TrackerError::analysis("API response had no text content"))
}

#[async_trait]
impl FoodAnalyzer for AnthropicAnalyzer {
    #[instrument(skip(self, image), fields(model = %self.model))]
    async fn analyze(&self, image: &CapturedImage) -> Result<AnalysisOutcome> {
        debug!("sending image to Anthropic");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.build_request(image))
            .send()
            .await
            .map_err(|e| {
                error!("failed to reach Anthropic API: {}", e);
                TrackerError::analysis(format!("network error: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("failed to read Anthropic API response: {}", e);
            TrackerError::analysis(format!("could not read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        parse_reply(&reply_text(&body)?)
    }
}
