//! # Handoff
//!
//! AI-guided offboarding interviews in your terminal.
//!
//! Handoff walks a departing employee through a structured knowledge-transfer
//! interview: it asks a generative-AI service which knowledge is at risk of
//! leaving with them, collects answers per topic (typed, or transcribed from
//! a recorded clip), and synthesizes everything into a handover document for
//! the team staying behind.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install handoff
//!
//! # The gateway needs a Gemini API key
//! export GEMINI_API_KEY=...
//!
//! # Start the wizard
//! handoff
//! ```

pub mod ai;
pub mod app;
pub mod core;
pub mod tui;

pub use ai::{Gateway, GatewayError, GeminiProvider, Provider};
pub use app::App;
pub use core::{
    Config, Effect, Intent, InterviewAnswer, KnowledgeGap, Screen, Session, UserContext,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "handoff";
