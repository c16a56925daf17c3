pub mod memory;

pub use memory::{MemorySession, MemoryStore};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FeedbackSummary, Interview, QuestionSet, TranscriptionRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Question set not found: {0}")]
    QuestionSetNotFound(String),
    #[error("Interview not found: {0}")]
    InterviewNotFound(String),
    #[error("Feedback not found for interview: {0}")]
    FeedbackNotFound(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// The hosted document database, reduced to the operations the pipeline
/// needs. Interviews own two child collections: transcriptions (one document
/// per question) and feedback (a single document under the fixed key
/// "summary").
///
/// There are no transactions; multi-document writes are issued one by one
/// and a crash between them can leave an interview without metadata or
/// feedback. Callers that need to reason about the partial-failure window
/// should read `TranscriptionPersister::save`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_question_set(&self, set: QuestionSet) -> Result<String>;
    async fn list_question_sets(&self) -> Result<Vec<QuestionSet>>;
    async fn get_question_set(&self, set_id: &str) -> Result<QuestionSet>;
    /// Rewrites the question list of an existing set in place.
    async fn update_question_set(&self, set_id: &str, questions: Vec<String>) -> Result<()>;
    async fn delete_question_set(&self, set_id: &str) -> Result<()>;

    async fn create_interview(&self, interview: Interview) -> Result<()>;
    async fn get_interview(&self, interview_id: &str) -> Result<Interview>;
    /// All interviews, newest first.
    async fn list_interviews(&self) -> Result<Vec<Interview>>;

    async fn add_transcription(
        &self,
        interview_id: &str,
        record: TranscriptionRecord,
    ) -> Result<()>;
    /// Transcriptions in the order they were written (question order).
    async fn list_transcriptions(&self, interview_id: &str) -> Result<Vec<TranscriptionRecord>>;

    /// Creates or fully overwrites the single summary document.
    async fn upsert_feedback(&self, interview_id: &str, summary: FeedbackSummary) -> Result<()>;
    async fn get_feedback(&self, interview_id: &str) -> Result<Option<FeedbackSummary>>;
    async fn delete_feedback(&self, interview_id: &str) -> Result<()>;
}

/// Session-scoped transient storage for page-to-page hand-offs. Values do not
/// survive the session and are never written to the document store.
pub trait SessionStore: Send + Sync {
    fn put(&self, key: &str, value: String);
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

/// Hand-off key: serialized `Vec<QuestionItem>` from selector to runner.
pub const SESSION_KEY_QUESTIONS: &str = "mock_interview_questions";
/// Hand-off key: interview id from runner to feedback page.
pub const SESSION_KEY_INTERVIEW_ID: &str = "current_interview_id";
