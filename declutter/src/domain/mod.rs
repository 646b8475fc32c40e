//! Domain types for Declutter
//!
//! The analysis result model shared by the client, the session state
//! machine and the presentation layer.

mod analysis;
mod priority;

pub use analysis::{AnalysisResult, ClutterTask};
pub use priority::Priority;
