//! Domain types for the branding report service
//!
//! A quiz session accumulates an [`AnswerSet`], the analysis step turns it
//! into an [`AnalysisResult`], and a persisted result plus its resolved
//! image location is a [`Report`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Survey question kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple choice with fixed options
    Choice,
    /// Free text input
    FreeText,
}

/// One selectable option of a choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Display label shown to the user
    pub label: String,
    /// Value recorded in the answer set
    pub value: String,
}

/// A survey question. The catalog is immutable and defined at process start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier (e.g. "Q1")
    pub id: String,
    /// Question kind
    pub kind: QuestionKind,
    /// Prompt text
    pub prompt: String,
    /// Options (choice questions only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    /// Input placeholder (free-text questions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Question {
    /// Create a choice question
    pub fn choice(id: &str, prompt: &str, options: &[(&str, &str)]) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::Choice,
            prompt: prompt.to_string(),
            options: options
                .iter()
                .map(|(label, value)| QuestionOption {
                    label: label.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            placeholder: None,
        }
    }

    /// Create a free-text question
    pub fn free_text(id: &str, prompt: &str, placeholder: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::FreeText,
            prompt: prompt.to_string(),
            options: Vec::new(),
            placeholder: Some(placeholder.to_string()),
        }
    }
}

/// Answers accumulated during one quiz session, keyed by question id.
///
/// Keys are unique; resubmitting a question overwrites its previous value.
/// A BTreeMap keeps iteration (and thus prompt construction) deterministic.
pub type AnswerSet = BTreeMap<String, String>;

/// Generated teacher character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
}

/// Growth point suggested by the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub title: String,
    pub description: String,
}

/// Structured output of the text-analysis call, pre-persistence.
///
/// All fields are required and `strengths` must be non-empty; the AI client
/// rejects payloads that do not satisfy this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub character: Character,
    pub slogan: String,
    pub strengths: Vec<String>,
    pub growth_point: GrowthPoint,
    /// English prompt for the image-generation model
    pub image_prompt: String,
}

/// A report before first persistence (no id / created_at yet)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport {
    pub character: Character,
    pub slogan: String,
    pub strengths: Vec<String>,
    pub growth_point: GrowthPoint,
    /// Publicly resolvable URL of the backing image blob
    pub image_url: String,
    /// Object-store name of the backing blob. Stored explicitly so
    /// retention and sync never re-derive it from the URL.
    pub blob_name: String,
}

/// The persisted, shareable form of an analysis result.
///
/// Lifecycle: constructed after image post-processing, persisted once
/// (store assigns id and created_at), read many times via the gallery,
/// eventually deleted by retention together with its backing blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub character: Character,
    pub slogan: String,
    pub strengths: Vec<String>,
    pub growth_point: GrowthPoint,
    pub image_url: String,
    pub blob_name: String,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Recover a blob name from an image URL's final path segment.
    ///
    /// Only needed for legacy rows written before `blob_name` became a
    /// first-class column.
    pub fn blob_name_from_url(url: &str) -> Option<String> {
        let tail = url.rsplit('/').next()?;
        if tail.is_empty() {
            None
        } else {
            Some(tail.to_string())
        }
    }

    /// Effective blob name: the stored one, or the URL tail for legacy rows
    pub fn effective_blob_name(&self) -> Option<String> {
        if !self.blob_name.is_empty() {
            Some(self.blob_name.clone())
        } else {
            Self::blob_name_from_url(&self.image_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_name_from_url() {
        assert_eq!(
            Report::blob_name_from_url("https://host/storage/v1/object/public/teacher-images/abc.png"),
            Some("abc.png".to_string())
        );
        assert_eq!(Report::blob_name_from_url("https://host/path/"), None);
        assert_eq!(Report::blob_name_from_url("plain.png"), Some("plain.png".to_string()));
    }

    #[test]
    fn test_analysis_result_roundtrip() {
        let json = r#"{
            "character": {"name": "등대 선생님", "description": "방향을 비추는 교사"},
            "slogan": "흔들림 없이 비추다",
            "strengths": ["인내심", "방향 제시"],
            "growth_point": {"title": "완급 조절", "description": "수업 속도를 유연하게"},
            "image_prompt": "A lighthouse teacher, warm colors, vector art"
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.strengths.len(), 2);
        assert_eq!(result.character.name, "등대 선생님");

        let back = serde_json::to_string(&result).unwrap();
        let again: AnalysisResult = serde_json::from_str(&back).unwrap();
        assert_eq!(result, again);
    }

    #[test]
    fn test_question_constructors() {
        let q = Question::choice("Q1", "수업 스타일은?", &[("강의", "lecture")]);
        assert_eq!(q.kind, QuestionKind::Choice);
        assert_eq!(q.options.len(), 1);
        assert!(q.placeholder.is_none());

        let q = Question::free_text("Q3", "키워드는?", "예: 따뜻함");
        assert_eq!(q.kind, QuestionKind::FreeText);
        assert!(q.options.is_empty());
    }
}
