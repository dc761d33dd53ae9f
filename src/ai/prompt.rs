//! Prompt construction and response validation for the AI gateway.
//!
//! Everything here is pure: building the instructions sent to the service
//! and validating what comes back. Keeping it out of the HTTP path lets the
//! whole request/response contract be tested without a network.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};

use crate::core::{InterviewAnswer, KnowledgeGap, UserContext};

/// System instruction for topic generation.
pub const TOPICS_SYSTEM_INSTRUCTION: &str =
    "You are an expert HR Knowledge Transfer specialist.";

/// Instruction sent alongside a recorded clip.
pub const TRANSCRIBE_INSTRUCTION: &str = "Transcribe the speech in this video interview answer \
     verbatim. If there is no speech, say '[No speech detected]'.";

/// Rendered in the synthesis prompt for topics without an answer.
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer provided.";

/// Build the topic-generation instruction from the employee's context.
pub fn topics_instruction(user: &UserContext) -> String {
    format!(
        "You are an AI Orchestrator for an employee offboarding system.\n\
         The employee is leaving the company. Your goal is to identify \"Knowledge Gaps\" \
         based on their role and department.\n\n\
         Employee Context:\n\
         Name: {}\n\
         Role: {}\n\
         Department: {}\n\n\
         Generate 4 specific, high-impact knowledge gaps that often occur when someone in \
         this specific role leaves.\n\
         For each gap, provide a structured interview question script.\n\
         Ensure the tone is professional, investigative but supportive.",
        user.name, user.role, user.department
    )
}

/// Response schema for topic generation: an array of objects with six
/// required string fields, matching [`KnowledgeGap`]'s wire format.
pub fn topics_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING", "description": "Unique identifier (e.g., gap-1)" },
                "title": { "type": "STRING", "description": "Short title of the knowledge gap (e.g., 'Legacy Payment API')" },
                "summary": { "type": "STRING", "description": "Why this is a risk (e.g., 'You are the only maintainer of X')" },
                "primaryQuestion": { "type": "STRING", "description": "The main open-ended question to ask." },
                "memoryPrompt": { "type": "STRING", "description": "A specific trigger to help them remember (e.g., 'Think about the Q4 outage...')" },
                "followUpQuestion": { "type": "STRING", "description": "A specific detail-oriented follow-up." }
            },
            "required": ["id", "title", "summary", "primaryQuestion", "memoryPrompt", "followUpQuestion"]
        }
    })
}

/// Parse and validate the schema-constrained topics response.
///
/// The service is asked for well-formed items but is not trusted to deliver
/// them: items with missing or blank fields and items reusing an id are
/// rejected here. An unparseable body yields an empty list, which callers
/// treat as a soft failure.
pub fn parse_topics(text: &str) -> Vec<KnowledgeGap> {
    let items: Vec<KnowledgeGap> = match serde_json::from_str(text) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, "topics response was not a valid JSON array");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut topics = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_complete() {
            tracing::warn!(id = %item.id, "rejecting topic with missing fields");
            continue;
        }
        if !seen.insert(item.id.clone()) {
            tracing::warn!(id = %item.id, "rejecting topic with duplicate id");
            continue;
        }
        topics.push(item);
    }
    topics
}

/// Build the handover-synthesis prompt from the full interview.
///
/// Topics are rendered in interview order; unanswered topics carry the
/// literal [`NO_ANSWER_PLACEHOLDER`] so the document still covers them.
pub fn handover_prompt(
    user: &UserContext,
    gaps: &[KnowledgeGap],
    answers: &HashMap<String, InterviewAnswer>,
) -> String {
    let interview_data: String = gaps
        .iter()
        .map(|gap| {
            let content = answers
                .get(&gap.id)
                .map(|answer| answer.content.as_str())
                .filter(|content| !content.trim().is_empty())
                .unwrap_or(NO_ANSWER_PLACEHOLDER);
            format!(
                "Topic: {}\nQuestion: {}\nTranscript of Video Answer: {}\n---\n\n",
                gap.title, gap.primary_question, content
            )
        })
        .collect();

    format!(
        "Create a professional Knowledge Handover Document based on the following video \
         interview transcripts.\n\n\
         Employee: {} ({})\n\n\
         Transcript:\n{}\n\
         Output Format: Markdown.\n\
         Structure:\n\
         1. Executive Summary\n\
         2. Critical Risks Identified\n\
         3. Detailed Knowledge Transfer (per topic)\n\
         4. Recommended Next Steps for the team taking over.",
        user.name, user.role, interview_data
    )
}
