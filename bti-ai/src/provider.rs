//! Analysis provider seam
//!
//! The HTTP layer depends on this trait rather than on a concrete client,
//! so tests can substitute a scripted provider.

use async_trait::async_trait;
use bti_core::{AnalysisResult, AnswerSet};

use crate::error::AiResult;

/// Remote generative-AI operations needed by the service
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Analyze a completed answer set into a structured branding report
    async fn analyze(&self, answers: &AnswerSet) -> AiResult<AnalysisResult>;

    /// Generate raw image bytes for a report's image prompt
    async fn generate_image(&self, prompt: &str) -> AiResult<Vec<u8>>;
}
