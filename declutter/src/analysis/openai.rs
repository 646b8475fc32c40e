//! OpenAI vision client implementation
//!
//! Implements AnalysisClient over the Chat Completions API, sending the
//! image as a data URL and requesting JSON-schema structured output.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::schema::{ANALYSIS_PROMPT, instruction_with_schema, parse_analysis, response_schema};
use super::{AnalysisClient, AnalysisError};
use crate::capture::ImagePayload;
use crate::config::AnalysisConfig;
use crate::domain::AnalysisResult;

/// OpenAI API client
pub struct OpenAIAnalyzer {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAIAnalyzer {
    /// Create a new client from configuration
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        debug!(provider = %config.provider, model = %config.model(), "OpenAIAnalyzer::from_config: called");
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

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, payload: &ImagePayload) -> serde_json::Value {
        debug!(%self.model, mime = %payload.mime(), "OpenAIAnalyzer::build_request_body: called");

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": ANALYSIS_PROMPT,
                },
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": instruction_with_schema(),
                        },
                        {
                            "type": "image_url",
                            "image_url": { "url": payload.data_url() },
                        },
                    ],
                },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "analysis_result",
                    "schema": response_schema(),
                },
            },
        });

        // GPT-5.x and o1/o3 models use max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(self.max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(self.max_tokens);
        }

        body
    }

    /// Pull the first choice's message text out of the response envelope
    fn extract_text(&self, body: &str) -> Result<String, AnalysisError> {
        debug!(body_len = body.len(), "OpenAIAnalyzer::extract_text: called");
        let api_response: OpenAIResponse = serde_json::from_str(body)
            .map_err(|e| AnalysisError::malformed(format!("unreadable response envelope: {}", e)))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::malformed("response contained no choices"))?;

        if choice.finish_reason.as_deref() == Some("length") {
            warn!(max_tokens = self.max_tokens, "OpenAIAnalyzer::extract_text: response truncated");
        }

        if let Some(refusal) = choice.message.refusal {
            debug!(%refusal, "OpenAIAnalyzer::extract_text: model refused");
            return Err(AnalysisError::malformed(format!("model refused: {}", refusal)));
        }

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(AnalysisError::malformed("response contained no text")),
        }
    }
}

#[async_trait]
impl AnalysisClient for OpenAIAnalyzer {
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisResult, AnalysisError> {
        debug!(%self.model, ?payload, "OpenAIAnalyzer::analyze: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(payload);

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "OpenAIAnalyzer::analyze: request failed");
                AnalysisError::from_reqwest(e, self.timeout)
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "OpenAIAnalyzer::analyze: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, message });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::from_reqwest(e, self.timeout))?;

        debug!("OpenAIAnalyzer::analyze: success");
        parse_analysis(&self.extract_text(&text)?)
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}
