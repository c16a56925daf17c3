//! Mock-interview practice pipeline: generate questions for a job profile,
//! record a practice session against a selected set, persist the per-question
//! transcripts, and evaluate them into stored feedback.
//!
//! The pipeline stages hand off to each other through a session store
//! (selected questions, then the saved interview id) and share one document
//! store. Camera, recorder and speech-to-text are trait seams in
//! [`interview::media`]; the text API sits behind [`ai::TextGenerator`], with
//! [`ai::GeminiClient`] as the hosted implementation.

pub mod ai;
pub mod config;
pub mod context;
pub mod feedback;
pub mod interview;
pub mod models;
pub mod parse;
pub mod questions;
pub mod store;

pub use config::AppConfig;
pub use context::AppContext;
pub use feedback::{FeedbackDashboard, FeedbackGenerator};
pub use interview::InterviewRunner;
pub use questions::{QuestionGenerator, QuestionSelector};
