use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

use super::{QuestionError, Result};
use crate::ai::{prompts, TextGenerator};
use crate::context::AppContext;
use crate::models::QuestionSet;
use crate::parse::parse_question_list;
use crate::store::DocumentStore;

/// Form state for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GeneratorForm {
    pub job_title: String,
    pub experience_level: String,
    pub interview_type: String,
    /// Used in place of `interview_type` when the type is "others".
    pub custom_type: String,
    pub industry: String,
    pub job_description: Option<String>,
}

impl GeneratorForm {
    /// The interview type that actually gets persisted.
    pub fn effective_type(&self) -> &str {
        if self.interview_type == "others" {
            &self.custom_type
        } else {
            &self.interview_type
        }
    }
}

/// One question in the accumulated in-memory list. Ids are minted from a
/// process-wide counter so rapid successive generations never collide.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuestion {
    pub id: u64,
    pub text: String,
}

/// Builds the question-generation prompt, parses the numbered-list response,
/// and accumulates questions across "generate more" rounds until an explicit
/// save persists them as one `QuestionSet`.
pub struct QuestionGenerator {
    ai: Arc<dyn TextGenerator>,
    store: Arc<dyn DocumentStore>,
    ctx: AppContext,
    questions: Vec<GeneratedQuestion>,
    next_id: AtomicU64,
    save_in_flight: AtomicBool,
}

impl QuestionGenerator {
    pub fn new(ai: Arc<dyn TextGenerator>, store: Arc<dyn DocumentStore>, ctx: AppContext) -> Self {
        Self {
            ai,
            store,
            ctx,
            questions: Vec::new(),
            next_id: AtomicU64::new(1),
            save_in_flight: AtomicBool::new(false),
        }
    }

    pub fn questions(&self) -> &[GeneratedQuestion] {
        &self.questions
    }

    /// One page of the accumulated list, independent of how many questions
    /// have been generated so far.
    pub fn page(&self, page: usize, per_page: usize) -> &[GeneratedQuestion] {
        let start = page.saturating_mul(per_page).min(self.questions.len());
        let end = (start + per_page).min(self.questions.len());
        &self.questions[start..end]
    }

    /// Generates one batch of questions and appends them to the in-memory
    /// list. On API or parse failure the prior list is left untouched.
    pub async fn generate(&mut self, form: &GeneratorForm) -> Result<usize> {
        if form.job_title.trim().is_empty() {
            return Err(QuestionError::MissingJobTitle);
        }

        let prompt = prompts::question_list(
            &form.job_title,
            &form.experience_level,
            form.effective_type(),
            &form.industry,
            form.job_description.as_deref(),
        );

        info!("🤖 Generating questions for {} position", form.job_title);

        let text = self.ai.generate(&prompt).await.map_err(|e| {
            error!("Error generating questions: {}", e);
            QuestionError::Generation(e)
        })?;

        let parsed = parse_question_list(&text);
        if parsed.is_empty() {
            error!("Question generation returned unparseable text");
            return Err(QuestionError::EmptyResponse);
        }

        let added = parsed.len();
        for text in parsed {
            self.questions.push(GeneratedQuestion {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                text,
            });
        }

        info!("✅ Generated {} questions ({} total)", added, self.questions.len());

        Ok(added)
    }

    /// Appends one manually written question.
    pub fn add_question(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuestionError::MissingQuestionText);
        }
        self.questions.push(GeneratedQuestion {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            text: text.to_string(),
        });
        Ok(())
    }

    /// Removes one entry from the in-memory list. Persisted sets are not
    /// affected until the next save.
    pub fn delete_question(&mut self, index: usize) {
        if index < self.questions.len() {
            self.questions.remove(index);
        }
    }

    /// Persists the accumulated list as one `QuestionSet` stamped with the
    /// current user. A save already in progress makes overlapping triggers
    /// silently no-op (`Ok(None)`) instead of double-submitting.
    pub async fn save(&self, form: &GeneratorForm) -> Result<Option<String>> {
        if self.save_in_flight.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        let result = self.persist(form).await;
        self.save_in_flight.store(false, Ordering::SeqCst);
        result.map(Some)
    }

    async fn persist(&self, form: &GeneratorForm) -> Result<String> {
        if self.questions.is_empty() {
            return Err(QuestionError::NoQuestions);
        }

        let set = QuestionSet {
            id: Uuid::new_v4().to_string(),
            job_title: form.job_title.clone(),
            experience_level: form.experience_level.clone(),
            interview_type: form.effective_type().to_string(),
            industry: form.industry.clone(),
            questions: self.questions.iter().map(|q| q.text.clone()).collect(),
            created_at: Utc::now(),
            owner_id: self.ctx.user_id.clone(),
        };

        let id = self.store.create_question_set(set).await?;
        info!("💾 Questions saved with ID: {}", id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct ScriptedGenerator {
        responses: Mutex<Vec<anyhow::Result<String>>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<anyhow::Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                return Err(anyhow!("no scripted response"));
            }
            responses.remove(0)
        }
    }

    fn form() -> GeneratorForm {
        GeneratorForm {
            job_title: "Backend Engineer".into(),
            experience_level: "mid-level".into(),
            interview_type: "technical".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn generation_parses_numbered_list() {
        let ai = ScriptedGenerator::new(vec![Ok(
            "1. What is a race condition?\n2. Explain idempotency.".into()
        )]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(ai, store, AppContext::anonymous());

        let added = generator.generate(&form()).await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(generator.questions()[0].text, "What is a race condition?");
        assert_eq!(generator.questions()[1].text, "Explain idempotency.");
    }

    #[tokio::test]
    async fn generate_more_appends_with_fresh_ids() {
        let ai = ScriptedGenerator::new(vec![
            Ok("1. First".into()),
            Ok("1. Second\n2. Third".into()),
        ]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(ai, store, AppContext::anonymous());

        generator.generate(&form()).await.unwrap();
        generator.generate(&form()).await.unwrap();

        let ids: Vec<u64> = generator.questions().iter().map(|q| q.id).collect();
        assert_eq!(generator.questions().len(), 3);
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn failed_generation_leaves_prior_state_untouched() {
        let ai = ScriptedGenerator::new(vec![
            Ok("1. Keeper".into()),
            Err(anyhow!("API unavailable")),
            Ok("   \n \n".into()),
        ]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(ai, store, AppContext::anonymous());

        generator.generate(&form()).await.unwrap();
        assert!(generator.generate(&form()).await.is_err());
        assert!(matches!(
            generator.generate(&form()).await,
            Err(QuestionError::EmptyResponse)
        ));
        assert_eq!(generator.questions().len(), 1);
    }

    #[tokio::test]
    async fn missing_job_title_is_rejected_before_any_call() {
        let ai = ScriptedGenerator::new(vec![]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(ai, store, AppContext::anonymous());

        let result = generator
            .generate(&GeneratorForm {
                job_title: "  ".into(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(QuestionError::MissingJobTitle)));
    }

    #[tokio::test]
    async fn save_stamps_owner_and_custom_type() {
        let ai = ScriptedGenerator::new(vec![Ok("1. Q".into())]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(
            ai,
            store.clone(),
            AppContext::signed_in("user-7"),
        );
        let mut form = form();
        form.interview_type = "others".into();
        form.custom_type = "pair programming".into();

        generator.generate(&form).await.unwrap();
        let id = generator.save(&form).await.unwrap().unwrap();

        let saved = store.get_question_set(&id).await.unwrap();
        assert_eq!(saved.owner_id.as_deref(), Some("user-7"));
        assert_eq!(saved.interview_type, "pair programming");
        assert_eq!(saved.questions, vec!["Q"]);
    }

    #[tokio::test]
    async fn overlapping_save_silently_noops() {
        let ai = ScriptedGenerator::new(vec![Ok("1. Q".into())]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(ai, store, AppContext::anonymous());
        generator.generate(&form()).await.unwrap();

        generator
            .save_in_flight
            .store(true, Ordering::SeqCst);
        assert!(generator.save(&form()).await.unwrap().is_none());

        generator.save_in_flight.store(false, Ordering::SeqCst);
        assert!(generator.save(&form()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn pagination_reveals_the_list_incrementally() {
        let ai = ScriptedGenerator::new(vec![Ok((1..=7)
            .map(|i| format!("{i}. Question {i}"))
            .collect::<Vec<_>>()
            .join("\n"))]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(ai, store, AppContext::anonymous());
        generator.generate(&form()).await.unwrap();

        assert_eq!(generator.page(0, 3).len(), 3);
        assert_eq!(generator.page(2, 3).len(), 1);
        assert!(generator.page(3, 3).is_empty());
    }

    #[tokio::test]
    async fn manual_add_rejects_blank_text() {
        let ai = ScriptedGenerator::new(vec![]);
        let store = Arc::new(MemoryStore::new());
        let mut generator = QuestionGenerator::new(ai, store, AppContext::anonymous());

        assert!(matches!(
            generator.add_question("   "),
            Err(QuestionError::MissingQuestionText)
        ));
        generator.add_question("Tell me about yourself").unwrap();
        assert_eq!(generator.questions().len(), 1);
    }
}
