use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved, named group of interview questions tied to one job profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    pub id: String,
    pub job_title: String,
    pub experience_level: String,
    pub interview_type: String,
    pub industry: String,
    pub questions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<String>,
}

/// One selectable question, denormalized so the interview runner needs no
/// further lookups. Exists only in the selector-to-runner hand-off; never
/// written to the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    /// `"<set_id>-<index>"`, stable from selection through feedback.
    pub id: String,
    pub set_id: String,
    pub job_title: String,
    pub question: String,
    pub timestamp: DateTime<Utc>,
}

/// One completed recording session. Owns transcriptions and, once the
/// feedback stage has run, a feedback summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    pub title: String,
    pub job_title: String,
    pub question_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Speech-to-text result for one question within one interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionRecord {
    pub question_id: String,
    pub question: String,
    pub transcript: String,
    pub timestamp: DateTime<Utc>,
}

/// AI evaluation of one answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub question_id: String,
    pub question: String,
    pub transcript: String,
    /// Assessment paragraph; carries the fixed failure message when the AI
    /// call for this question failed.
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// 1-10 when parsed, 0 when the score line was absent or the call failed.
    pub score: u8,
    pub model_answer: Option<String>,
}

/// The full feedback for one interview: all per-question items plus one
/// holistic paragraph. Stored under the fixed child key "summary".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub items: Vec<FeedbackItem>,
    pub overall: String,
    pub generated_at: DateTime<Utc>,
}

impl FeedbackSummary {
    /// Rounded mean of the item scores. Failed items score 0 and still count
    /// toward the denominator.
    pub fn average_score(&self) -> u8 {
        if self.items.is_empty() {
            return 0;
        }
        let total: u32 = self.items.iter().map(|i| i.score as u32).sum();
        (total as f64 / self.items.len() as f64).round() as u8
    }
}
