//! AI gateway module.
//!
//! Everything the wizard delegates to the generative-AI service lives
//! behind this boundary: proposing interview topics from the employee's
//! context, transcribing recorded clips, and synthesizing the final
//! handover document. Each operation is a single request/response cycle;
//! there is no retry, backoff, or streaming.

mod gemini;
mod prompt;

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::core::{AiConfig, InterviewAnswer, KnowledgeGap, UserContext};

pub use gemini::{GeminiProvider, API_KEY_VAR};
pub use prompt::{handover_prompt, parse_topics, topics_instruction, NO_ANSWER_PLACEHOLDER};

/// What the model is told to answer for a silent clip.
pub const NO_SPEECH_SENTINEL: &str = "[No speech detected]";

/// Inline stand-in for a transcript the service could not produce.
pub const TRANSCRIPT_ERROR_SENTINEL: &str = "[Error generating transcript]";

/// Document body returned when synthesis yields no text.
pub const SUMMARY_FALLBACK: &str = "Failed to generate summary.";

/// Gateway error types.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("request blocked by the service: {0}")]
    Blocked(String),

    #[error("async runtime error: {0}")]
    Runtime(String),
}

/// Trait for generative-AI providers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Propose interview topics for a departing employee.
    async fn generate_topics(&self, user: &UserContext)
        -> Result<Vec<KnowledgeGap>, GatewayError>;

    /// Transcribe a recorded clip verbatim.
    async fn transcribe(&self, media: &[u8], mime_type: &str) -> Result<String, GatewayError>;

    /// Synthesize the handover document from the collected interview.
    async fn synthesize_handover(
        &self,
        user: &UserContext,
        gaps: &[KnowledgeGap],
        answers: &HashMap<String, InterviewAnswer>,
    ) -> Result<String, GatewayError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// The boundary the wizard talks to.
///
/// Topic generation and synthesis propagate failures because they gate a
/// screen transition the user must hear about; transcription is
/// best-effort and never fails past this point.
pub struct Gateway {
    provider: Box<dyn Provider>,
}

impl Gateway {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Build a gateway backed by the Gemini provider, reading the API key
    /// from the environment.
    pub fn from_env(config: &AiConfig) -> Result<Self, GatewayError> {
        GeminiProvider::from_env(config).map(|provider| Self::new(Box::new(provider)))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Propose interview topics. An empty list means the service answered
    /// but produced nothing usable; callers treat that as a soft failure.
    pub async fn generate_topics(
        &self,
        user: &UserContext,
    ) -> Result<Vec<KnowledgeGap>, GatewayError> {
        let topics = self.provider.generate_topics(user).await?;
        tracing::debug!(count = topics.len(), "topics generated");
        Ok(topics)
    }

    /// Transcribe a clip, swallowing every failure into a sentinel so the
    /// interview is never blocked by a transcription problem.
    pub async fn transcribe(&self, media: &[u8], mime_type: &str) -> String {
        match self.provider.transcribe(media, mime_type).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(provider = self.provider.name(), error = %err, "transcription failed");
                TRANSCRIPT_ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Synthesize the handover document.
    pub async fn synthesize_handover(
        &self,
        user: &UserContext,
        gaps: &[KnowledgeGap],
        answers: &HashMap<String, InterviewAnswer>,
    ) -> Result<String, GatewayError> {
        self.provider.synthesize_handover(user, gaps, answers).await
    }
}

/// MIME type for a recorded clip, inferred from its extension.
///
/// `video/mp4` is the generic container default for anything unknown.
pub fn clip_mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("webm") => "video/webm",
        Some(ext) if ext.eq_ignore_ascii_case("mov") => "video/quicktime",
        _ => "video/mp4",
    }
}
