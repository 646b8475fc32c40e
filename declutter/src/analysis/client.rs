//! AnalysisClient trait definition

use async_trait::async_trait;

use super::AnalysisError;
use crate::capture::ImagePayload;
use crate::domain::AnalysisResult;

/// Stateless vision client - one call per captured image
///
/// The only network-crossing operation. Implementations make exactly one
/// attempt; retrying is left to the user (capture again).
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Send the image with the fixed instruction and parse the answer
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisResult, AnalysisError>;
}
