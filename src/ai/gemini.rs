//! Gemini API integration.
//!
//! Implements the [`Provider`] trait against the `generateContent`
//! endpoint. All three gateway operations go through the same
//! request/response cycle; only the parts and generation config differ.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{AiConfig, InterviewAnswer, KnowledgeGap, UserContext};

use super::prompt;
use super::{GatewayError, Provider, SUMMARY_FALLBACK};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider from configuration.
    ///
    /// Reads the API key from `GEMINI_API_KEY`; a missing or blank key is a
    /// configuration error for every gateway operation.
    pub fn from_env(config: &AiConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| GatewayError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create with a custom base URL (proxies, local test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Make a `generateContent` request and return the response body.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GatewayError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            // Header auth keeps the key out of request logs.
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api { status, body });
        }

        let body: GenerateResponse = response.json().await?;

        if let Some(feedback) = &body.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(GatewayError::Blocked(reason.clone()));
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_topics(
        &self,
        user: &UserContext,
    ) -> Result<Vec<KnowledgeGap>, GatewayError> {
        let request = GenerateRequest {
            contents: vec![Content::text(prompt::topics_instruction(user))],
            system_instruction: Some(Content::text(prompt::TOPICS_SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompt::topics_schema()),
            }),
        };

        let response = self.generate(&request).await?;
        // A response with no text parses to zero topics; the caller treats
        // that as a soft failure and asks the user to retry.
        Ok(response.text().map(|text| prompt::parse_topics(&text)).unwrap_or_default())
    }

    async fn transcribe(&self, media: &[u8], mime_type: &str) -> Result<String, GatewayError> {
        let data = general_purpose::STANDARD.encode(media);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Media {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data,
                        },
                    },
                    Part::Text {
                        text: prompt::TRANSCRIBE_INSTRUCTION.to_string(),
                    },
                ],
            }],
            system_instruction: None,
            generation_config: None,
        };

        let response = self.generate(&request).await?;
        Ok(response.text().map(|text| text.trim().to_string()).unwrap_or_default())
    }

    async fn synthesize_handover(
        &self,
        user: &UserContext,
        gaps: &[KnowledgeGap],
        answers: &HashMap<String, InterviewAnswer>,
    ) -> Result<String, GatewayError> {
        let request = GenerateRequest {
            contents: vec![Content::text(prompt::handover_prompt(user, gaps, answers))],
            system_instruction: None,
            generation_config: None,
        };

        let response = self.generate(&request).await?;
        Ok(response.text().unwrap_or_else(|| SUMMARY_FALLBACK.to_string()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Gemini `generateContent` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One content block: an ordered list of text/media parts.
#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

/// A single part in a content block.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Media {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Inline base64 media payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Structured-output controls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

/// Gemini `generateContent` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,

    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate's first part, if the model produced any.
    fn text(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .clone()
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn provider() -> GeminiProvider {
        GeminiProvider {
            client: Client::new(),
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_fails_without_key() {
        std::env::remove_var(API_KEY_VAR);
        let result = GeminiProvider::from_env(&AiConfig::default());
        assert!(matches!(result, Err(GatewayError::MissingApiKey)));
    }

    #[test]
    #[serial]
    fn test_from_env_fails_with_blank_key() {
        std::env::set_var(API_KEY_VAR, "   ");
        let result = GeminiProvider::from_env(&AiConfig::default());
        assert!(matches!(result, Err(GatewayError::MissingApiKey)));
        std::env::remove_var(API_KEY_VAR);
    }

    #[test]
    #[serial]
    fn test_from_env_honors_config() {
        std::env::set_var(API_KEY_VAR, "test-key");
        let config = AiConfig {
            model: "gemini-2.0-pro".to_string(),
            base_url: Some("http://localhost:9000/v1beta".to_string()),
        };
        let provider = GeminiProvider::from_env(&config).unwrap();
        assert_eq!(provider.model, "gemini-2.0-pro");
        assert_eq!(provider.base_url, "http://localhost:9000/v1beta");
        std::env::remove_var(API_KEY_VAR);
    }

    #[test]
    fn test_builders() {
        let provider = provider().with_model("gemini-exp").with_base_url("http://localhost:1");
        assert_eq!(provider.model, "gemini-exp");
        assert_eq!(provider.base_url, "http://localhost:1");
    }

    #[test]
    fn test_media_request_wire_format() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Media {
                        inline_data: InlineData {
                            mime_type: "video/mp4".to_string(),
                            data: "AAAA".to_string(),
                        },
                    },
                    Part::Text {
                        text: "transcribe".to_string(),
                    },
                ],
            }],
            system_instruction: None,
            generation_config: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "video/mp4");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "transcribe");
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn test_structured_request_wire_format() {
        let request = GenerateRequest {
            contents: vec![Content::text("prompt")],
            system_instruction: Some(Content::text("system")),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(prompt::topics_schema()),
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "hello" }] } }
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text().as_deref(), Some("hello"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());

        let empty: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }"#,
        )
        .unwrap();
        assert!(empty.text().is_none());
    }
}
