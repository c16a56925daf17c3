use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::models::{Interview, TranscriptionRecord};
use crate::store::{DocumentStore, Result};

/// Writes a completed recording session to durable storage: one transcription
/// document per question, then the interview metadata document.
pub struct TranscriptionPersister {
    store: Arc<dyn DocumentStore>,
}

impl TranscriptionPersister {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn mint_interview_id() -> String {
        format!("interview_{}", Utc::now().timestamp_millis())
    }

    /// Persists the records under a freshly minted interview id and returns
    /// it. With no records nothing is written and `None` comes back.
    ///
    /// The writes are sequential and not transactional: a crash after the
    /// transcription writes but before the metadata write leaves orphaned
    /// transcriptions that no interview references. The feedback stage only
    /// discovers interviews through their metadata document, so the orphan is
    /// invisible rather than corrupting.
    pub async fn save(
        &self,
        title: &str,
        job_title: &str,
        records: &[TranscriptionRecord],
    ) -> Result<Option<String>> {
        if records.is_empty() {
            return Ok(None);
        }

        let interview_id = Self::mint_interview_id();

        for record in records {
            self.store
                .add_transcription(&interview_id, record.clone())
                .await?;
        }

        self.store
            .create_interview(Interview {
                id: interview_id.clone(),
                title: title.to_string(),
                job_title: job_title.to_string(),
                question_count: records.len() as u32,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            "💾 Saved interview {} with {} transcriptions",
            interview_id,
            records.len()
        );

        Ok(Some(interview_id))
    }
}
