//! Analysis client module for Declutter
//!
//! Sends one captured image to a hosted vision model and turns the answer
//! into an [`AnalysisResult`](crate::domain::AnalysisResult).

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
pub mod schema;

pub use anthropic::AnthropicAnalyzer;
pub use client::AnalysisClient;
pub use error::{AnalysisError, ErrorKind};
pub use openai::OpenAIAnalyzer;
pub use schema::{ANALYSIS_PROMPT, parse_analysis, response_schema};

use crate::config::AnalysisConfig;

/// Create an analysis client based on the provider specified in config
///
/// Supports "anthropic" and "openai" providers.
pub fn create_client(config: &AnalysisConfig) -> Result<Arc<dyn AnalysisClient>, AnalysisError> {
    debug!(provider = %config.provider, model = %config.model(), "create_client: called");
    match config.provider.as_str() {
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicAnalyzer::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIAnalyzer::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(AnalysisError::Config(format!(
                "Unknown analysis provider: '{}'. Supported: anthropic, openai",
                other
            )))
        }
    }
}
