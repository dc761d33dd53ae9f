//! Core types and functionality for Handoff.
//!
//! This module contains the fundamental data structures used throughout
//! the application: the interview domain types, the wizard session state
//! machine, configuration, and document export.

mod config;
mod export;
mod interview;
mod session;

pub use config::{AiConfig, Config, ExportConfig, UiConfig};
pub use export::export_document;
pub use interview::{InterviewAnswer, KnowledgeGap, UserContext};
pub use session::{Alert, Effect, Intent, Screen, Session, SessionError};
