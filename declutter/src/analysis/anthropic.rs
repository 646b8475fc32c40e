//! Anthropic Claude vision client
//!
//! Implements AnalysisClient over the Messages API: one user message with a
//! base64 image block followed by the schema instruction.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::schema::{ANALYSIS_PROMPT, instruction_with_schema, parse_analysis};
use super::{AnalysisClient, AnalysisError};
use crate::capture::ImagePayload;
use crate::config::AnalysisConfig;
use crate::domain::AnalysisResult;

/// Anthropic Claude API client
pub struct AnthropicAnalyzer {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicAnalyzer {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable or file in config.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        debug!(provider = %config.provider, model = %config.model(), "AnthropicAnalyzer::from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AnalysisError::Network)?;

        Ok(Self {
            model: config.model().to_string(),
            api_key,
            base_url: config.base_url().to_string(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, payload: &ImagePayload) -> serde_json::Value {
        debug!(%self.model, mime = %payload.mime(), "AnthropicAnalyzer::build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": ANALYSIS_PROMPT,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": payload.mime(),
                            "data": payload.data,
                        },
                    },
                    {
                        "type": "text",
                        "text": instruction_with_schema(),
                    },
                ],
            }],
        })
    }

    /// Pull the model's text out of the response envelope
    fn extract_text(&self, body: &str) -> Result<String, AnalysisError> {
        debug!(body_len = body.len(), "AnthropicAnalyzer::extract_text: called");
        let api_response: AnthropicResponse = serde_json::from_str(body)
            .map_err(|e| AnalysisError::malformed(format!("unreadable response envelope: {}", e)))?;

        if api_response.stop_reason.as_deref() == Some("max_tokens") {
            warn!(max_tokens = self.max_tokens, "AnthropicAnalyzer::extract_text: response truncated");
        }

        let text: String = api_response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Other => None,
            })
            .collect();

        if text.trim().is_empty() {
            debug!("AnthropicAnalyzer::extract_text: no text content");
            return Err(AnalysisError::malformed("response contained no text"));
        }
        Ok(text)
    }
}

#[async_trait]
impl AnalysisClient for AnthropicAnalyzer {
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisResult, AnalysisError> {
        debug!(%self.model, ?payload, "AnthropicAnalyzer::analyze: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(payload);

        let response = self
            .http
            .post(url)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "AnthropicAnalyzer::analyze: request failed");
                AnalysisError::from_reqwest(e, self.timeout)
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "AnthropicAnalyzer::analyze: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, message });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::from_reqwest(e, self.timeout))?;

        debug!("AnthropicAnalyzer::analyze: success");
        parse_analysis(&self.extract_text(&text)?)
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}
