use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use super::{FeedbackError, Result};
use crate::ai::{prompts, TextGenerator};
use crate::models::{FeedbackItem, FeedbackSummary};
use crate::parse;
use crate::store::{DocumentStore, SessionStore, SESSION_KEY_INTERVIEW_ID};

/// Shown in place of the per-question assessment when its evaluation call
/// failed.
pub const QUESTION_FAILURE_MESSAGE: &str =
    "Failed to generate feedback. Please try again later.";
/// Shown in place of the holistic paragraph when the overall call failed.
pub const OVERALL_FAILURE_MESSAGE: &str =
    "Failed to generate overall feedback. Please try again later.";

/// Per-question progress callback so a caller can render "Evaluating answer
/// 3 of 8" while the sequential calls run.
pub trait FeedbackProgress: Send + Sync {
    fn on_question(&self, _index: usize, _total: usize) {}
    fn on_overall(&self) {}
}

/// No-op progress for callers that do not render it.
impl FeedbackProgress for () {}

/// Evaluates one saved interview: one text-API call per answered question
/// plus one holistic call, degraded per question on failure, and the result
/// stored under the interview's fixed summary key.
pub struct FeedbackGenerator {
    ai: Arc<dyn TextGenerator>,
    store: Arc<dyn DocumentStore>,
}

impl FeedbackGenerator {
    pub fn new(ai: Arc<dyn TextGenerator>, store: Arc<dyn DocumentStore>) -> Self {
        Self { ai, store }
    }

    /// The interview the feedback page should evaluate, from the runner's
    /// session hand-off. Absence means the caller redirects back to the
    /// interview page.
    pub fn interview_id_from_session(session: &dyn SessionStore) -> Result<String> {
        session
            .get(SESSION_KEY_INTERVIEW_ID)
            .ok_or(FeedbackError::NoInterview)
    }

    /// Returns the stored summary verbatim when one exists, with no AI calls;
    /// otherwise generates, stores, and returns a fresh one.
    pub async fn ensure(
        &self,
        interview_id: &str,
        progress: &dyn FeedbackProgress,
    ) -> Result<FeedbackSummary> {
        if let Some(existing) = self.store.get_feedback(interview_id).await? {
            info!("📋 Reusing stored feedback for {}", interview_id);
            return Ok(existing);
        }
        self.generate_and_store(interview_id, progress).await
    }

    /// Reruns the full evaluation and overwrites the stored summary, existing
    /// feedback or not.
    pub async fn regenerate(
        &self,
        interview_id: &str,
        progress: &dyn FeedbackProgress,
    ) -> Result<FeedbackSummary> {
        self.generate_and_store(interview_id, progress).await
    }

    async fn generate_and_store(
        &self,
        interview_id: &str,
        progress: &dyn FeedbackProgress,
    ) -> Result<FeedbackSummary> {
        let interview = self.store.get_interview(interview_id).await?;
        let records = self.store.list_transcriptions(interview_id).await?;
        let total = records.len();
        info!("🤖 Generating feedback for {} ({} answers)", interview_id, total);

        let mut items = Vec::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            progress.on_question(index + 1, total);
            let prompt =
                prompts::answer_feedback(&record.question, &record.transcript, &interview.job_title);
            let item = match self.ai.generate(&prompt).await {
                Ok(response) => {
                    let parsed = parse::parse_feedback(&response);
                    FeedbackItem {
                        question_id: record.question_id,
                        question: record.question,
                        transcript: record.transcript,
                        feedback: parsed.assessment,
                        strengths: parsed.strengths,
                        improvements: parsed.improvements,
                        score: parsed.score,
                        model_answer: parsed.model_answer,
                    }
                }
                Err(e) => {
                    // One bad call degrades its own item; the rest continue.
                    warn!("Feedback call failed for {}: {:#}", record.question_id, e);
                    FeedbackItem {
                        question_id: record.question_id,
                        question: record.question,
                        transcript: record.transcript,
                        feedback: QUESTION_FAILURE_MESSAGE.to_string(),
                        strengths: Vec::new(),
                        improvements: Vec::new(),
                        score: 0,
                        model_answer: None,
                    }
                }
            };
            items.push(item);
        }

        progress.on_overall();
        let overall = match self
            .ai
            .generate(&prompts::overall_feedback(&items, &interview.job_title))
            .await
        {
            Ok(response) => response.trim().to_string(),
            Err(e) => {
                warn!("Overall feedback call failed for {}: {:#}", interview_id, e);
                OVERALL_FAILURE_MESSAGE.to_string()
            }
        };

        let summary = FeedbackSummary {
            items,
            overall,
            generated_at: Utc::now(),
        };
        self.store.upsert_feedback(interview_id, summary.clone()).await?;
        info!(
            "✅ Stored feedback for {} (average {}/10)",
            interview_id,
            summary.average_score()
        );
        Ok(summary)
    }
}
