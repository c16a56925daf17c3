use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{DocumentStore, Result, SessionStore, StoreError};
use crate::models::{FeedbackSummary, Interview, QuestionSet, TranscriptionRecord};

#[derive(Default)]
struct Collections {
    question_sets: Vec<QuestionSet>,
    interviews: Vec<Interview>,
    transcriptions: HashMap<String, Vec<TranscriptionRecord>>,
    feedback: HashMap<String, FeedbackSummary>,
}

/// In-memory document store. Backs the test suite and embedders that run
/// without a hosted database; insertion order is preserved so child
/// transcriptions come back in question order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_question_set(&self, set: QuestionSet) -> Result<String> {
        let id = set.id.clone();
        self.inner.lock().question_sets.push(set);
        Ok(id)
    }

    async fn list_question_sets(&self) -> Result<Vec<QuestionSet>> {
        Ok(self.inner.lock().question_sets.clone())
    }

    async fn get_question_set(&self, set_id: &str) -> Result<QuestionSet> {
        self.inner
            .lock()
            .question_sets
            .iter()
            .find(|s| s.id == set_id)
            .cloned()
            .ok_or_else(|| StoreError::QuestionSetNotFound(set_id.to_string()))
    }

    async fn update_question_set(&self, set_id: &str, questions: Vec<String>) -> Result<()> {
        let mut inner = self.inner.lock();
        let set = inner
            .question_sets
            .iter_mut()
            .find(|s| s.id == set_id)
            .ok_or_else(|| StoreError::QuestionSetNotFound(set_id.to_string()))?;
        set.questions = questions;
        Ok(())
    }

    async fn delete_question_set(&self, set_id: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let before = inner.question_sets.len();
        inner.question_sets.retain(|s| s.id != set_id);
        if inner.question_sets.len() == before {
            return Err(StoreError::QuestionSetNotFound(set_id.to_string()));
        }
        Ok(())
    }

    async fn create_interview(&self, interview: Interview) -> Result<()> {
        self.inner.lock().interviews.push(interview);
        Ok(())
    }

    async fn get_interview(&self, interview_id: &str) -> Result<Interview> {
        self.inner
            .lock()
            .interviews
            .iter()
            .find(|i| i.id == interview_id)
            .cloned()
            .ok_or_else(|| StoreError::InterviewNotFound(interview_id.to_string()))
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>> {
        let mut interviews = self.inner.lock().interviews.clone();
        interviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(interviews)
    }

    async fn add_transcription(
        &self,
        interview_id: &str,
        record: TranscriptionRecord,
    ) -> Result<()> {
        self.inner
            .lock()
            .transcriptions
            .entry(interview_id.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn list_transcriptions(&self, interview_id: &str) -> Result<Vec<TranscriptionRecord>> {
        Ok(self
            .inner
            .lock()
            .transcriptions
            .get(interview_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_feedback(&self, interview_id: &str, summary: FeedbackSummary) -> Result<()> {
        self.inner
            .lock()
            .feedback
            .insert(interview_id.to_string(), summary);
        Ok(())
    }

    async fn get_feedback(&self, interview_id: &str) -> Result<Option<FeedbackSummary>> {
        Ok(self.inner.lock().feedback.get(interview_id).cloned())
    }

    async fn delete_feedback(&self, interview_id: &str) -> Result<()> {
        self.inner
            .lock()
            .feedback
            .remove(interview_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::FeedbackNotFound(interview_id.to_string()))
    }
}

/// In-memory session storage, the stand-in for the browser's session-scoped
/// storage in tests and embedders.
#[derive(Clone, Default)]
pub struct MemorySession {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn put(&self, key: &str, value: String) {
        self.inner.lock().insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        self.inner.lock().remove(key);
    }
}
