//! Wizard session state machine.
//!
//! The session is a single in-memory aggregate updated reducer-style:
//! [`Session::apply`] turns a user intent into a state change plus an
//! optional [`Effect`] the caller must execute against the AI gateway, and
//! the `resolve_*` methods feed a call's outcome back in. No network I/O
//! happens here, which keeps every transition unit-testable in isolation.
//!
//! Each transition into a processing screen bumps the session epoch, and
//! every [`Effect`] carries the epoch it was issued under. An outcome whose
//! epoch no longer matches is dropped, so a late response can never write
//! into a session that was reset or navigated away in the meantime.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;

use crate::ai::GatewayError;

use super::interview::{InterviewAnswer, KnowledgeGap, UserContext};

/// The five wizard screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Identity form.
    #[default]
    Welcome,
    /// Waiting for the gateway to propose interview topics.
    LoadingGaps,
    /// Walking the topic list, collecting answers.
    Interview,
    /// Waiting for the gateway to synthesize the handover document.
    Finalizing,
    /// Terminal screen showing the finished document.
    Completed,
}

/// A user action raised by the presentation layer.
#[derive(Debug, Clone)]
pub enum Intent {
    /// Submit the identity form and start topic generation.
    SubmitIdentity(UserContext),
    /// Merge an edit into the current topic's answer.
    EditAnswer {
        content: Option<String>,
        video_path: Option<PathBuf>,
    },
    /// Move to the previous topic. No-op on the first one.
    PrevTopic,
    /// Move to the next topic, or trigger finalization on the last one.
    NextTopic,
    /// Jump directly to a topic by position.
    JumpTo(usize),
    /// Discard the whole session and return to the welcome screen.
    Reset,
}

/// A network call the caller must run on behalf of the session.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Ask the gateway to propose interview topics.
    GenerateTopics { epoch: u64, user: UserContext },
    /// Ask the gateway to synthesize the handover document.
    Synthesize {
        epoch: u64,
        user: UserContext,
        gaps: Vec<KnowledgeGap>,
        answers: HashMap<String, InterviewAnswer>,
    },
}

/// A user-visible notice produced by a failed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The service answered but proposed no usable topics.
    NoTopics,
    /// Topic generation failed outright.
    TopicsFailed(String),
    /// Document synthesis failed; the interview can be retried.
    SynthesisFailed(String),
}

impl Alert {
    /// Message to surface to the user.
    pub fn message(&self) -> String {
        match self {
            Self::NoTopics => "Could not identify any topics. Please try again.".to_string(),
            Self::TopicsFailed(reason) => format!("Topic generation failed: {reason}"),
            Self::SynthesisFailed(reason) => format!("Could not generate the handover: {reason}"),
        }
    }
}

/// Errors for intents the current screen cannot honor.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("no topic at position {0}")]
    TopicOutOfRange(usize),

    #[error("action not available on this screen")]
    NotAvailable,
}

/// The wizard session aggregate.
///
/// Owns everything a running interview needs; destroyed wholesale on reset.
#[derive(Debug, Default)]
pub struct Session {
    screen: Screen,
    user: Option<UserContext>,
    gaps: Vec<KnowledgeGap>,
    answers: HashMap<String, InterviewAnswer>,
    current: usize,
    document: Option<String>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user(&self) -> Option<&UserContext> {
        self.user.as_ref()
    }

    /// Topics in interview order. Fixed once installed.
    pub fn gaps(&self) -> &[KnowledgeGap] {
        &self.gaps
    }

    pub fn answers(&self) -> &HashMap<String, InterviewAnswer> {
        &self.answers
    }

    /// Index of the active topic. Always within bounds once the interview
    /// has begun.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_gap(&self) -> Option<&KnowledgeGap> {
        self.gaps.get(self.current)
    }

    pub fn current_answer(&self) -> Option<&InterviewAnswer> {
        self.current_gap().and_then(|gap| self.answers.get(&gap.id))
    }

    pub fn answer_for(&self, gap_id: &str) -> Option<&InterviewAnswer> {
        self.answers.get(gap_id)
    }

    /// The synthesized handover. Only present on the completed screen.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Generation token attached to outstanding gateway calls.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a gateway call is outstanding for a screen transition.
    ///
    /// The UI disables duplicate submissions while this holds.
    pub fn is_processing(&self) -> bool {
        matches!(self.screen, Screen::LoadingGaps | Screen::Finalizing)
    }

    /// Apply a user intent, returning the gateway call it requires, if any.
    pub fn apply(&mut self, intent: Intent) -> Result<Option<Effect>, SessionError> {
        match intent {
            Intent::SubmitIdentity(user) => self.submit_identity(user),
            Intent::EditAnswer {
                content,
                video_path,
            } => self.edit_answer(content, video_path),
            Intent::PrevTopic => self.prev_topic(),
            Intent::NextTopic => self.next_topic(),
            Intent::JumpTo(index) => self.jump_to(index),
            Intent::Reset => {
                *self = Self::new();
                Ok(None)
            }
        }
    }

    fn submit_identity(&mut self, user: UserContext) -> Result<Option<Effect>, SessionError> {
        if self.screen != Screen::Welcome {
            return Err(SessionError::NotAvailable);
        }
        if let Some(field) = user.missing_field() {
            return Err(SessionError::MissingField(field));
        }

        self.epoch += 1;
        self.user = Some(user.clone());
        self.screen = Screen::LoadingGaps;
        Ok(Some(Effect::GenerateTopics {
            epoch: self.epoch,
            user,
        }))
    }

    fn edit_answer(
        &mut self,
        content: Option<String>,
        video_path: Option<PathBuf>,
    ) -> Result<Option<Effect>, SessionError> {
        if self.screen != Screen::Interview {
            return Err(SessionError::NotAvailable);
        }
        let Some(gap) = self.gaps.get(self.current) else {
            return Err(SessionError::NotAvailable);
        };

        let entry = self
            .answers
            .entry(gap.id.clone())
            .or_insert_with(|| InterviewAnswer::empty(gap.id.clone()));
        if let Some(content) = content {
            entry.content = content;
        }
        if let Some(path) = video_path {
            entry.video_path = Some(path);
        }
        entry.last_updated = Utc::now();
        Ok(None)
    }

    fn prev_topic(&mut self) -> Result<Option<Effect>, SessionError> {
        if self.screen != Screen::Interview {
            return Err(SessionError::NotAvailable);
        }
        self.current = self.current.saturating_sub(1);
        Ok(None)
    }

    fn next_topic(&mut self) -> Result<Option<Effect>, SessionError> {
        if self.screen != Screen::Interview {
            return Err(SessionError::NotAvailable);
        }
        if self.current + 1 < self.gaps.len() {
            self.current += 1;
            return Ok(None);
        }
        self.finalize()
    }

    fn jump_to(&mut self, index: usize) -> Result<Option<Effect>, SessionError> {
        if self.screen != Screen::Interview {
            return Err(SessionError::NotAvailable);
        }
        if index >= self.gaps.len() {
            return Err(SessionError::TopicOutOfRange(index));
        }
        self.current = index;
        Ok(None)
    }

    fn finalize(&mut self) -> Result<Option<Effect>, SessionError> {
        let Some(user) = self.user.clone() else {
            return Err(SessionError::NotAvailable);
        };

        self.epoch += 1;
        self.screen = Screen::Finalizing;
        Ok(Some(Effect::Synthesize {
            epoch: self.epoch,
            user,
            gaps: self.gaps.clone(),
            answers: self.answers.clone(),
        }))
    }

    /// Feed back the outcome of a [`Effect::GenerateTopics`] call.
    ///
    /// Outcomes from a stale epoch or the wrong screen are dropped.
    pub fn resolve_topics(
        &mut self,
        epoch: u64,
        outcome: Result<Vec<KnowledgeGap>, GatewayError>,
    ) -> Option<Alert> {
        if epoch != self.epoch || self.screen != Screen::LoadingGaps {
            tracing::debug!(epoch, current = self.epoch, "dropping stale topics outcome");
            return None;
        }

        match outcome {
            Ok(gaps) if !gaps.is_empty() => {
                self.gaps = gaps;
                self.answers.clear();
                self.current = 0;
                self.screen = Screen::Interview;
                None
            }
            Ok(_) => {
                self.gaps.clear();
                self.screen = Screen::Welcome;
                Some(Alert::NoTopics)
            }
            Err(err) => {
                tracing::warn!(error = %err, "topic generation failed");
                self.gaps.clear();
                self.screen = Screen::Welcome;
                Some(Alert::TopicsFailed(err.to_string()))
            }
        }
    }

    /// Feed back the outcome of a [`Effect::Synthesize`] call.
    ///
    /// On failure the interview screen is restored with all answers intact
    /// so the user can retry.
    pub fn resolve_document(
        &mut self,
        epoch: u64,
        outcome: Result<String, GatewayError>,
    ) -> Option<Alert> {
        if epoch != self.epoch || self.screen != Screen::Finalizing {
            tracing::debug!(epoch, current = self.epoch, "dropping stale document outcome");
            return None;
        }

        match outcome {
            Ok(document) => {
                self.document = Some(document);
                self.screen = Screen::Completed;
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "handover synthesis failed");
                self.screen = Screen::Interview;
                Some(Alert::SynthesisFailed(err.to_string()))
            }
        }
    }

    /// Merge a finished transcription into the answer it belongs to.
    ///
    /// Transcription is best-effort and arrives keyed by gap id rather than
    /// by position, so an outcome for a topic the user has navigated away
    /// from still lands on the right answer. Outcomes for an ended session
    /// or an unknown topic are dropped.
    pub fn resolve_transcript(&mut self, gap_id: &str, path: PathBuf, text: String) {
        if self.screen != Screen::Interview {
            tracing::debug!(gap_id, "dropping transcript for ended session");
            return;
        }
        if !self.gaps.iter().any(|gap| gap.id == gap_id) {
            tracing::debug!(gap_id, "dropping transcript for unknown topic");
            return;
        }

        let entry = self
            .answers
            .entry(gap_id.to_string())
            .or_insert_with(|| InterviewAnswer::empty(gap_id));
        entry.content = text;
        entry.video_path = Some(path);
        entry.last_updated = Utc::now();
    }
}
