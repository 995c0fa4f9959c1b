//! BTI AI Clients
//!
//! Remote generative-AI access for the branding report service: a text
//! analysis call that turns a completed answer set into an
//! [`bti_core::AnalysisResult`], and an image generation call that turns the
//! result's prompt into raw image bytes.
//!
//! Both calls are one-shot — no retry, no timeout override beyond the
//! transport default. The [`AnalysisProvider`] trait is the seam the HTTP
//! layer and tests plug into.

pub mod client;
pub mod error;
pub mod prompt;
pub mod provider;

pub use client::{GeminiClient, GeminiConfig};
pub use error::{AiError, AiResult};
pub use prompt::build_analysis_prompt;
pub use provider::AnalysisProvider;
