//! Gemini API client
//!
//! Talks to the Generative Language API: `generateContent` for text
//! analysis, `predict` (Imagen) for image generation. Wire shapes follow
//! the public API; the base URL is configurable so tests can point the
//! client at a stub server.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bti_core::{AnalysisResult, AnswerSet};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{AiError, AiResult};
use crate::prompt::{build_analysis_prompt, strip_code_fences};
use crate::provider::AnalysisProvider;

/// Default Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Text analysis model
pub const TEXT_MODEL: &str = "gemini-2.0-flash";

/// Image generation model
pub const IMAGE_MODEL: &str = "imagen-3.0-generate-002";

/// Client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, appended as a query parameter
    pub api_key: String,
    /// Base URL of the API (overridable for tests)
    pub base_url: String,
    /// Transport timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Config against the production endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: GeminiConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn model_url(&self, model: &str, verb: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}?key={}",
            self.config.base_url, model, verb, self.config.api_key
        )
    }

    /// Validate that a parsed analysis result is complete
    fn validate(result: &AnalysisResult) -> AiResult<()> {
        if result.strengths.is_empty() {
            return Err(AiError::MalformedResponse("empty strengths list".into()));
        }
        if result.character.name.trim().is_empty()
            || result.slogan.trim().is_empty()
            || result.image_prompt.trim().is_empty()
        {
            return Err(AiError::MalformedResponse(
                "required analysis field is empty".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn analyze(&self, answers: &AnswerSet) -> AiResult<AnalysisResult> {
        let prompt = build_analysis_prompt(answers);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = self.model_url(TEXT_MODEL, "generateContent");
        debug!(model = TEXT_MODEL, "Submitting analysis request");

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| AiError::MalformedResponse("no candidates in response".into()))?;

        let cleaned = strip_code_fences(text);
        let result: AnalysisResult = serde_json::from_str(&cleaned)
            .map_err(|e| AiError::MalformedResponse(format!("not an analysis result: {}", e)))?;
        Self::validate(&result)?;

        info!(character = %result.character.name, "Analysis complete");
        Ok(result)
    }

    async fn generate_image(&self, prompt: &str) -> AiResult<Vec<u8>> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters { sample_count: 1 },
        };

        let url = self.model_url(IMAGE_MODEL, "predict");
        debug!(model = IMAGE_MODEL, "Submitting image generation request");

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        let encoded = body
            .predictions
            .first()
            .map(|p| p.bytes_base64_encoded.as_str())
            .ok_or_else(|| AiError::MalformedResponse("no predictions in response".into()))?;

        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| AiError::MalformedResponse(format!("prediction not base64: {}", e)))?;

        info!(size = bytes.len(), "Image generated");
        Ok(bytes)
    }
}

// ============================================
// Wire Types
// ============================================

#[derive(Debug, Clone, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Clone, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".into(),
                }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_predict_request_shape() {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: "an owl".into(),
            }],
            parameters: PredictParameters { sample_count: 1 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["instances"][0]["prompt"], "an owl");
        assert_eq!(json["parameters"]["sampleCount"], 1);
    }

    #[test]
    fn test_candidate_response_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "```json\n{}\n```"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].content.parts[0].text, "```json\n{}\n```");
    }

    #[test]
    fn test_zero_candidates_parses_to_empty() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn test_prediction_field_name() {
        let json = r#"{"predictions": [{"bytesBase64Encoded": "aGVsbG8="}]}"#;
        let response: PredictResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.predictions[0].bytes_base64_encoded, "aGVsbG8=");
    }

    #[test]
    fn test_validate_rejects_empty_strengths() {
        let result = AnalysisResult {
            character: bti_core::Character {
                name: "교사".into(),
                description: "desc".into(),
            },
            slogan: "slogan".into(),
            strengths: vec![],
            growth_point: bti_core::GrowthPoint {
                title: "t".into(),
                description: "d".into(),
            },
            image_prompt: "prompt".into(),
        };
        assert!(matches!(
            GeminiClient::validate(&result),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_model_url() {
        let client = GeminiClient::new(
            GeminiConfig::new("k123").with_base_url("http://localhost:9999"),
        )
        .unwrap();
        assert_eq!(
            client.model_url(TEXT_MODEL, "generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent?key=k123"
        );
    }
}
