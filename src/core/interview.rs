//! Interview domain types.
//!
//! These are the records the wizard carries through a session: who is
//! leaving, which topics the interview should cover, and what was said
//! about each topic.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the departing employee, captured once on the welcome screen.
///
/// Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub name: String,
    pub role: String,
    pub department: String,
}

impl UserContext {
    /// Create a context, trimming surrounding whitespace from each field.
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            role: role.into().trim().to_string(),
            department: department.into().trim().to_string(),
        }
    }

    /// The first empty identity field, if any.
    ///
    /// All three fields must be filled before an interview can start.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            Some("name")
        } else if self.role.is_empty() {
            Some("role")
        } else if self.department.is_empty() {
            Some("department")
        } else {
            None
        }
    }
}

/// A topic the interview should cover, produced by the AI gateway from a
/// [`UserContext`] and read-only afterwards.
///
/// Field names are camelCase on the wire because that is the shape the
/// model is asked to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeGap {
    /// Unique, stable identifier (e.g. `gap-1`).
    pub id: String,
    /// Short title of the topic (e.g. "Legacy Payment API").
    pub title: String,
    /// Why losing this knowledge is a risk.
    pub summary: String,
    /// The main open-ended question to ask.
    pub primary_question: String,
    /// A concrete trigger to help the interviewee remember.
    pub memory_prompt: String,
    /// A detail-oriented follow-up.
    pub follow_up_question: String,
}

impl KnowledgeGap {
    /// Whether every field carries usable text.
    ///
    /// Model output is validated with this before a topic is accepted.
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty()
            && !self.title.trim().is_empty()
            && !self.summary.trim().is_empty()
            && !self.primary_question.trim().is_empty()
            && !self.memory_prompt.trim().is_empty()
            && !self.follow_up_question.trim().is_empty()
    }
}

/// The collected answer for one topic. At most one exists per gap id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewAnswer {
    /// Id of the [`KnowledgeGap`] this answer belongs to.
    pub gap_id: String,
    /// Free text, possibly an AI-produced transcript.
    pub content: String,
    /// Local path of a recorded clip, when one was attached.
    pub video_path: Option<PathBuf>,
    /// When the answer was last edited.
    pub last_updated: DateTime<Utc>,
}

impl InterviewAnswer {
    /// A fresh, empty answer for a topic.
    pub fn empty(gap_id: impl Into<String>) -> Self {
        Self {
            gap_id: gap_id.into(),
            content: String::new(),
            video_path: None,
            last_updated: Utc::now(),
        }
    }

    /// Whether the answer carries any content or media.
    pub fn is_answered(&self) -> bool {
        !self.content.trim().is_empty() || self.video_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(id: &str) -> KnowledgeGap {
        KnowledgeGap {
            id: id.to_string(),
            title: "Legacy Payment API".to_string(),
            summary: "Only maintainer of the settlement batch job".to_string(),
            primary_question: "Walk me through the settlement flow.".to_string(),
            memory_prompt: "Think about the Q4 outage.".to_string(),
            follow_up_question: "Where do the retry queues live?".to_string(),
        }
    }

    #[test]
    fn test_user_context_trims_fields() {
        let ctx = UserContext::new("  Alex Chen ", "Senior Backend Engineer", " Platform ");
        assert_eq!(ctx.name, "Alex Chen");
        assert_eq!(ctx.department, "Platform");
        assert!(ctx.missing_field().is_none());
    }

    #[test]
    fn test_user_context_reports_first_missing_field() {
        let ctx = UserContext::new("Alex", "   ", "");
        assert_eq!(ctx.missing_field(), Some("role"));

        let ctx = UserContext::new("", "Engineer", "Platform");
        assert_eq!(ctx.missing_field(), Some("name"));
    }

    #[test]
    fn test_gap_completeness() {
        assert!(gap("gap-1").is_complete());

        let mut incomplete = gap("gap-1");
        incomplete.memory_prompt = "   ".to_string();
        assert!(!incomplete.is_complete());
    }

    #[test]
    fn test_gap_wire_format_is_camel_case() {
        let value = serde_json::to_value(gap("gap-1")).unwrap();
        assert!(value.get("primaryQuestion").is_some());
        assert!(value.get("memoryPrompt").is_some());
        assert!(value.get("followUpQuestion").is_some());
        assert!(value.get("primary_question").is_none());
    }

    #[test]
    fn test_answer_is_answered() {
        let mut answer = InterviewAnswer::empty("gap-1");
        assert!(!answer.is_answered());

        answer.content = "We rotate keys manually via script X".to_string();
        assert!(answer.is_answered());

        let mut video_only = InterviewAnswer::empty("gap-2");
        video_only.video_path = Some(PathBuf::from("/tmp/clip.webm"));
        assert!(video_only.is_answered());
    }
}
