//! BTI Core
//!
//! Domain types and session logic for the 쌤BTI teacher branding report
//! service: the question catalog, the quiz flow state machine, the analysis
//! result / report shapes, and the admin token codec.
//!
//! Everything here is pure — no I/O. The AI clients live in `bti-ai`,
//! persistence in `bti-store`, and the HTTP surface in `bti-api`.

pub mod constants;
pub mod error;
pub mod flow;
pub mod questions;
pub mod token;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use flow::{FlowStep, Page, QuizFlow};
pub use questions::questions;
pub use token::AdminToken;
pub use types::{
    AnalysisResult, AnswerSet, Character, GrowthPoint, NewReport, Question, QuestionKind,
    QuestionOption, Report,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
