//! Application state and lifecycle management.
//!
//! This module contains the `App` struct that holds all application state
//! and coordinates between the TUI, the wizard session, and the AI
//! gateway. Gateway calls run on a worker thread and report back over a
//! channel polled from the TUI tick, so the interface stays responsive
//! while a request is in flight.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::ai::{clip_mime_type, Gateway, GatewayError};
use crate::core::{Config, Effect, Intent, KnowledgeGap, Screen, Session, SessionError};
use crate::tui::Theme;

/// Identity form field labels, in tab order.
pub const FORM_FIELDS: [&str; 3] = ["Name", "Role", "Department"];

/// The welcome screen's identity form.
#[derive(Debug, Default)]
pub struct IdentityForm {
    /// Field values in [`FORM_FIELDS`] order.
    pub values: [String; 3],
    /// Index of the focused field.
    pub focus: usize,
}

impl IdentityForm {
    pub fn active_value_mut(&mut self) -> &mut String {
        &mut self.values[self.focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FORM_FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    /// Build the user context from the current field values.
    pub fn to_context(&self) -> crate::core::UserContext {
        crate::core::UserContext::new(
            self.values[0].clone(),
            self.values[1].clone(),
            self.values[2].clone(),
        )
    }
}

/// Which interview pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterviewFocus {
    /// The answer editor.
    #[default]
    Answer,
    /// The topic sidebar.
    Topics,
}

/// Outcome of a finished gateway call, sent back from the worker thread.
#[derive(Debug)]
enum CallOutcome {
    Topics {
        epoch: u64,
        result: Result<Vec<KnowledgeGap>, GatewayError>,
    },
    Document {
        epoch: u64,
        result: Result<String, GatewayError>,
    },
    Transcript {
        gap_id: String,
        path: PathBuf,
        text: String,
    },
}

/// What kind of call is outstanding, for display and for recovering from a
/// worker that died without reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingKind {
    Topics { epoch: u64 },
    Document { epoch: u64 },
    Transcript { gap_id: String },
}

struct PendingCall {
    kind: PendingKind,
    rx: Receiver<CallOutcome>,
}

/// Main application state.
pub struct App {
    /// The wizard session aggregate.
    pub session: Session,

    /// Application configuration.
    pub config: Config,

    /// Current UI theme.
    pub theme: Theme,

    /// Whether the application should quit.
    pub should_quit: bool,

    /// Status message to display (if any).
    pub status_message: Option<String>,

    /// Welcome screen identity form.
    pub form: IdentityForm,

    /// Editing buffer for the current topic's answer.
    pub answer_input: String,

    /// Focused interview pane.
    pub focus: InterviewFocus,

    /// Sidebar selection, tracked separately from the active topic so the
    /// user can browse without jumping.
    pub topic_cursor: usize,

    /// Path buffer for the attach-clip overlay; `Some` while it is open.
    pub attach_input: Option<String>,

    /// Scroll offset in the completed document view.
    pub doc_scroll: u16,

    /// Where the document was last exported, if it was.
    pub exported_to: Option<PathBuf>,

    /// Rotating spinner frame for processing screens.
    pub spinner_frame: usize,

    gateway: Option<Arc<Gateway>>,
    pending: Option<PendingCall>,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config) -> Self {
        let theme = Theme::from_name(&config.ui.theme);
        Self {
            session: Session::new(),
            config,
            theme,
            should_quit: false,
            status_message: None,
            form: IdentityForm::default(),
            answer_input: String::new(),
            focus: InterviewFocus::default(),
            topic_cursor: 0,
            attach_input: None,
            doc_scroll: 0,
            exported_to: None,
            spinner_frame: 0,
            gateway: None,
            pending: None,
        }
    }

    /// Create with an explicit gateway instead of building one from the
    /// environment on first use.
    pub fn with_gateway(config: Config, gateway: Gateway) -> Self {
        let mut app = Self::new(config);
        app.gateway = Some(Arc::new(gateway));
        app
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Whether a gateway call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the outstanding call is a transcription for `gap_id`.
    pub fn is_transcribing(&self, gap_id: &str) -> bool {
        matches!(
            &self.pending,
            Some(PendingCall {
                kind: PendingKind::Transcript { gap_id: pending },
                ..
            }) if pending == gap_id
        )
    }

    /// Periodic tick from the TUI loop.
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.poll_pending();
    }

    // --- Welcome ---

    /// Submit the identity form and start topic generation.
    pub fn submit_identity(&mut self) {
        if self.is_busy() {
            return;
        }
        self.status_message = None;
        match self.session.apply(Intent::SubmitIdentity(self.form.to_context())) {
            Ok(Some(effect)) => self.start_effect(effect),
            Ok(None) => {}
            Err(SessionError::MissingField(field)) => {
                self.set_status(format!("Please fill in your {field} first."));
            }
            Err(err) => self.set_status(err.to_string()),
        }
    }

    // --- Interview ---

    /// Persist the answer editor into the session.
    pub fn save_answer(&mut self) {
        let _ = self.session.apply(Intent::EditAnswer {
            content: Some(self.answer_input.clone()),
            video_path: None,
        });
    }

    pub fn prev_topic(&mut self) {
        self.save_answer();
        if self.session.apply(Intent::PrevTopic).is_ok() {
            self.sync_interview_state();
        }
    }

    /// Advance, or finalize on the last topic.
    pub fn next_topic(&mut self) {
        self.save_answer();
        let on_last = self.session.current_index() + 1 == self.session.gaps().len();
        if on_last && self.is_busy() {
            self.set_status("Still transcribing - one moment before finishing.");
            return;
        }
        match self.session.apply(Intent::NextTopic) {
            Ok(Some(effect)) => self.start_effect(effect),
            Ok(None) => self.sync_interview_state(),
            Err(_) => {}
        }
    }

    /// Jump straight to the topic under the sidebar cursor.
    pub fn jump_to(&mut self, index: usize) {
        self.save_answer();
        if self.session.apply(Intent::JumpTo(index)).is_ok() {
            self.sync_interview_state();
        }
    }

    /// Attach a recorded clip to the current topic and transcribe it.
    pub fn attach_clip(&mut self, raw_path: &str) {
        if self.session.screen() != Screen::Interview {
            return;
        }
        if self.is_busy() {
            self.set_status("Another request is still running.");
            return;
        }
        let Some(gap_id) = self.session.current_gap().map(|gap| gap.id.clone()) else {
            return;
        };

        let path = PathBuf::from(raw_path.trim());
        let media = match std::fs::read(&path) {
            Ok(media) => media,
            Err(err) => {
                self.set_status(format!("Could not read clip {}: {err}", path.display()));
                return;
            }
        };

        let gateway = match self.gateway() {
            Ok(gateway) => gateway,
            Err(err) => {
                self.set_status(err.to_string());
                return;
            }
        };

        // Record the clip on the answer right away; the transcript follows.
        let _ = self.session.apply(Intent::EditAnswer {
            content: None,
            video_path: Some(path.clone()),
        });

        let mime_type = clip_mime_type(&path).to_string();
        let (tx, rx) = mpsc::channel();
        let worker_gap_id = gap_id.clone();
        thread::spawn(move || {
            let text = match worker_runtime() {
                Ok(runtime) => runtime.block_on(gateway.transcribe(&media, &mime_type)),
                Err(err) => {
                    tracing::warn!(error = %err, "transcription worker had no runtime");
                    crate::ai::TRANSCRIPT_ERROR_SENTINEL.to_string()
                }
            };
            let _ = tx.send(CallOutcome::Transcript {
                gap_id: worker_gap_id,
                path,
                text,
            });
        });

        self.pending = Some(PendingCall {
            kind: PendingKind::Transcript { gap_id },
            rx,
        });
        self.set_status("Transcribing clip...");
    }

    /// Discard the running session and return to the welcome screen.
    ///
    /// Dropping the pending receiver abandons any in-flight call; its late
    /// result has nowhere to land.
    pub fn exit_session(&mut self) {
        self.pending = None;
        let _ = self.session.apply(Intent::Reset);
        self.answer_input.clear();
        self.attach_input = None;
        self.doc_scroll = 0;
        self.exported_to = None;
        self.topic_cursor = 0;
        self.focus = InterviewFocus::default();
        self.status_message = None;
    }

    // --- Completed ---

    /// Write the handover document to disk.
    pub fn export_document(&mut self) {
        let Some(document) = self.session.document().map(str::to_string) else {
            self.set_status("No document to export yet.");
            return;
        };
        let Some(user) = self.session.user().cloned() else {
            self.set_status("No document to export yet.");
            return;
        };

        let dir = self
            .config
            .export
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        match crate::core::export_document(&dir, &user, &document) {
            Ok(path) => {
                self.set_status(format!("Exported to {}", path.display()));
                self.exported_to = Some(path);
            }
            Err(err) => self.set_status(format!("Export failed: {err}")),
        }
    }

    // --- Effects & outcomes ---

    fn gateway(&mut self) -> Result<Arc<Gateway>, GatewayError> {
        if let Some(gateway) = &self.gateway {
            return Ok(Arc::clone(gateway));
        }
        let gateway = Arc::new(Gateway::from_env(&self.config.ai)?);
        self.gateway = Some(Arc::clone(&gateway));
        Ok(gateway)
    }

    fn start_effect(&mut self, effect: Effect) {
        match effect {
            Effect::GenerateTopics { epoch, user } => {
                let gateway = match self.gateway() {
                    Ok(gateway) => gateway,
                    Err(err) => {
                        self.apply_topics_outcome(epoch, Err(err));
                        return;
                    }
                };
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    let result = match worker_runtime() {
                        Ok(runtime) => runtime.block_on(gateway.generate_topics(&user)),
                        Err(err) => Err(err),
                    };
                    let _ = tx.send(CallOutcome::Topics { epoch, result });
                });
                self.pending = Some(PendingCall {
                    kind: PendingKind::Topics { epoch },
                    rx,
                });
            }
            Effect::Synthesize {
                epoch,
                user,
                gaps,
                answers,
            } => {
                let gateway = match self.gateway() {
                    Ok(gateway) => gateway,
                    Err(err) => {
                        self.apply_document_outcome(epoch, Err(err));
                        return;
                    }
                };
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    let result = match worker_runtime() {
                        Ok(runtime) => {
                            runtime.block_on(gateway.synthesize_handover(&user, &gaps, &answers))
                        }
                        Err(err) => Err(err),
                    };
                    let _ = tx.send(CallOutcome::Document { epoch, result });
                });
                self.pending = Some(PendingCall {
                    kind: PendingKind::Document { epoch },
                    rx,
                });
            }
        }
    }

    /// Check the worker channel for a finished call.
    fn poll_pending(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                self.apply_outcome(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting; resolve as a failure so
                // the user is not left on a spinner.
                let kind = pending.kind.clone();
                self.pending = None;
                let died = || GatewayError::Runtime("worker thread terminated".to_string());
                match kind {
                    PendingKind::Topics { epoch } => self.apply_topics_outcome(epoch, Err(died())),
                    PendingKind::Document { epoch } => {
                        self.apply_document_outcome(epoch, Err(died()));
                    }
                    PendingKind::Transcript { .. } => {}
                }
            }
        }
    }

    fn apply_outcome(&mut self, outcome: CallOutcome) {
        match outcome {
            CallOutcome::Topics { epoch, result } => self.apply_topics_outcome(epoch, result),
            CallOutcome::Document { epoch, result } => self.apply_document_outcome(epoch, result),
            CallOutcome::Transcript { gap_id, path, text } => {
                if self.session.screen() != Screen::Interview {
                    return;
                }
                self.session.resolve_transcript(&gap_id, path, text.clone());
                let current = self.session.current_gap().map(|gap| gap.id.clone());
                if current.as_deref() == Some(gap_id.as_str()) {
                    self.answer_input = text;
                }
                self.set_status("Transcript ready.");
            }
        }
    }

    fn apply_topics_outcome(
        &mut self,
        epoch: u64,
        result: Result<Vec<KnowledgeGap>, GatewayError>,
    ) {
        if let Some(alert) = self.session.resolve_topics(epoch, result) {
            self.set_status(alert.message());
        }
        if self.session.screen() == Screen::Interview {
            self.focus = InterviewFocus::Answer;
            self.sync_interview_state();
        }
    }

    fn apply_document_outcome(&mut self, epoch: u64, result: Result<String, GatewayError>) {
        if let Some(alert) = self.session.resolve_document(epoch, result) {
            self.set_status(alert.message());
        }
        match self.session.screen() {
            Screen::Completed => {
                self.doc_scroll = 0;
                self.exported_to = None;
            }
            Screen::Interview => self.sync_interview_state(),
            _ => {}
        }
    }

    /// Refresh the editor buffer and sidebar cursor from the session.
    fn sync_interview_state(&mut self) {
        self.answer_input = self
            .session
            .current_answer()
            .map(|answer| answer.content.clone())
            .unwrap_or_default();
        self.topic_cursor = self.session.current_index();
    }
}

/// Single-threaded runtime for one worker call.
fn worker_runtime() -> Result<tokio::runtime::Runtime, GatewayError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| GatewayError::Runtime(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Provider;
    use crate::core::{InterviewAnswer, UserContext};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Deterministic provider for exercising the full wizard flow.
    struct StubProvider {
        topics: Vec<KnowledgeGap>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        async fn generate_topics(
            &self,
            _user: &UserContext,
        ) -> Result<Vec<KnowledgeGap>, GatewayError> {
            Ok(self.topics.clone())
        }

        async fn transcribe(
            &self,
            _media: &[u8],
            _mime_type: &str,
        ) -> Result<String, GatewayError> {
            Ok("stub transcript".to_string())
        }

        async fn synthesize_handover(
            &self,
            _user: &UserContext,
            gaps: &[KnowledgeGap],
            _answers: &HashMap<String, InterviewAnswer>,
        ) -> Result<String, GatewayError> {
            Ok(format!("# Handover covering {} topics", gaps.len()))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn gap(id: &str) -> KnowledgeGap {
        KnowledgeGap {
            id: id.to_string(),
            title: format!("Topic {id}"),
            summary: "risk".to_string(),
            primary_question: "How?".to_string(),
            memory_prompt: "Think.".to_string(),
            follow_up_question: "Who?".to_string(),
        }
    }

    fn stub_app(topics: Vec<KnowledgeGap>) -> App {
        let gateway = Gateway::new(Box::new(StubProvider { topics }));
        App::with_gateway(Config::default(), gateway)
    }

    fn fill_form(app: &mut App) {
        app.form.values = [
            "Alex Chen".to_string(),
            "Senior Backend Engineer".to_string(),
            "Platform Infrastructure".to_string(),
        ];
    }

    /// Tick until the outstanding call resolves or the deadline passes.
    fn settle(app: &mut App) {
        for _ in 0..200 {
            app.tick();
            if !app.is_busy() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("pending call never settled");
    }

    #[test]
    fn test_submit_with_empty_field_sets_status() {
        let mut app = stub_app(vec![gap("gap-1")]);
        app.form.values[0] = "Alex".to_string();
        app.submit_identity();

        assert_eq!(app.session.screen(), Screen::Welcome);
        assert!(app.status_message.as_deref().unwrap().contains("role"));
    }

    #[test]
    fn test_full_flow_reaches_completed() {
        let mut app = stub_app(vec![gap("gap-1"), gap("gap-2")]);
        fill_form(&mut app);

        app.submit_identity();
        assert_eq!(app.session.screen(), Screen::LoadingGaps);
        settle(&mut app);
        assert_eq!(app.session.screen(), Screen::Interview);
        assert_eq!(app.session.gaps().len(), 2);

        app.answer_input = "We rotate keys manually".to_string();
        app.next_topic();
        assert_eq!(app.session.current_index(), 1);
        assert_eq!(app.answer_input, "");

        app.next_topic();
        assert_eq!(app.session.screen(), Screen::Finalizing);
        settle(&mut app);
        assert_eq!(app.session.screen(), Screen::Completed);
        assert_eq!(app.session.document(), Some("# Handover covering 2 topics"));
    }

    #[test]
    fn test_no_topics_returns_to_welcome_with_alert() {
        let mut app = stub_app(vec![]);
        fill_form(&mut app);

        app.submit_identity();
        settle(&mut app);

        assert_eq!(app.session.screen(), Screen::Welcome);
        assert!(app.status_message.as_deref().unwrap().contains("try again"));
        assert!(app.session.gaps().is_empty());
    }

    #[test]
    fn test_navigation_preserves_answers_per_topic() {
        let mut app = stub_app(vec![gap("gap-1"), gap("gap-2")]);
        fill_form(&mut app);
        app.submit_identity();
        settle(&mut app);

        app.answer_input = "first".to_string();
        app.next_topic();
        app.answer_input = "second".to_string();
        app.prev_topic();

        assert_eq!(app.answer_input, "first");
        assert_eq!(app.session.answer_for("gap-2").unwrap().content, "second");
    }

    #[test]
    fn test_attach_clip_transcribes_into_answer() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("answer.webm");
        std::fs::write(&clip, b"fake media").unwrap();

        let mut app = stub_app(vec![gap("gap-1")]);
        fill_form(&mut app);
        app.submit_identity();
        settle(&mut app);

        app.attach_clip(clip.to_str().unwrap());
        assert!(app.is_busy());
        assert!(app.is_transcribing("gap-1"));
        settle(&mut app);

        let answer = app.session.answer_for("gap-1").unwrap();
        assert_eq!(answer.content, "stub transcript");
        assert_eq!(answer.video_path.as_deref(), Some(clip.as_path()));
        assert_eq!(app.answer_input, "stub transcript");
    }

    #[test]
    fn test_attach_clip_with_missing_file_reports_and_stays_idle() {
        let mut app = stub_app(vec![gap("gap-1")]);
        fill_form(&mut app);
        app.submit_identity();
        settle(&mut app);

        app.attach_clip("/definitely/not/here.mp4");
        assert!(!app.is_busy());
        assert!(app.status_message.as_deref().unwrap().contains("Could not read clip"));
    }

    #[test]
    fn test_exit_session_discards_everything() {
        let mut app = stub_app(vec![gap("gap-1")]);
        fill_form(&mut app);
        app.submit_identity();
        settle(&mut app);
        app.answer_input = "secret".to_string();
        app.save_answer();

        app.exit_session();

        assert_eq!(app.session.screen(), Screen::Welcome);
        assert!(app.session.answers().is_empty());
        assert!(app.answer_input.is_empty());
    }

    #[test]
    fn test_export_without_document_reports() {
        let mut app = stub_app(vec![]);
        app.export_document();
        assert!(app.status_message.as_deref().unwrap().contains("No document"));
    }

    #[test]
    fn test_export_writes_to_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = stub_app(vec![gap("gap-1")]);
        app.config.export.dir = Some(dir.path().to_path_buf());
        fill_form(&mut app);
        app.submit_identity();
        settle(&mut app);
        app.next_topic();
        settle(&mut app);
        assert_eq!(app.session.screen(), Screen::Completed);

        app.export_document();

        let exported = app.exported_to.clone().unwrap();
        assert!(exported.starts_with(dir.path()));
        assert!(std::fs::read_to_string(exported).unwrap().contains("Handover"));
    }

    #[test]
    fn test_form_field_cycling() {
        let mut form = IdentityForm::default();
        assert_eq!(form.focus, 0);
        form.next_field();
        form.next_field();
        assert_eq!(form.focus, 2);
        form.next_field();
        assert_eq!(form.focus, 0);
        form.prev_field();
        assert_eq!(form.focus, 2);
    }
}
