use std::sync::Arc;

use log::info;

use super::Result;
use crate::models::{FeedbackItem, FeedbackSummary, Interview};
use crate::store::DocumentStore;

/// One dashboard card: an interview that has stored feedback.
#[derive(Debug, Clone)]
pub struct DashboardEntry {
    pub interview: Interview,
    pub summary: FeedbackSummary,
    pub average_score: u8,
}

impl DashboardEntry {
    /// The first two per-question items, for the collapsed card view.
    pub fn preview(&self) -> &[FeedbackItem] {
        let n = self.summary.items.len().min(2);
        &self.summary.items[..n]
    }
}

/// Read model over every past interview's stored feedback. Interviews whose
/// feedback was never generated or was deleted do not appear.
pub struct FeedbackDashboard {
    store: Arc<dyn DocumentStore>,
    entries: Vec<DashboardEntry>,
}

impl FeedbackDashboard {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            entries: Vec::new(),
        }
    }

    /// Loads every interview that has a summary, newest first.
    pub async fn load(&mut self) -> Result<()> {
        let mut entries = Vec::new();
        for interview in self.store.list_interviews().await? {
            if let Some(summary) = self.store.get_feedback(&interview.id).await? {
                let average_score = summary.average_score();
                entries.push(DashboardEntry {
                    interview,
                    summary,
                    average_score,
                });
            }
        }
        self.entries = entries;
        Ok(())
    }

    pub fn entries(&self) -> &[DashboardEntry] {
        &self.entries
    }

    /// Case-insensitive substring search over the interview title and job
    /// title. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&DashboardEntry> {
        let query = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                query.is_empty()
                    || entry.interview.title.to_lowercase().contains(&query)
                    || entry.interview.job_title.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Deletes one interview's feedback summary. The interview and its
    /// transcriptions stay, so feedback can be generated again later.
    /// Destructive; callers show a blocking confirmation first.
    pub async fn delete_feedback(&mut self, interview_id: &str) -> Result<()> {
        self.store.delete_feedback(interview_id).await?;
        self.entries
            .retain(|entry| entry.interview.id != interview_id);
        info!("🗑️ Deleted feedback for {}", interview_id);
        Ok(())
    }
}
