use std::sync::Arc;

use log::info;

use super::{QuestionError, Result};
use crate::models::{QuestionItem, QuestionSet};
use crate::store::{DocumentStore, SessionStore, SESSION_KEY_QUESTIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    Newest,
    Oldest,
    JobTitle,
}

/// Visual state of a set's select-all control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Lists persisted question sets and tracks an ordered, flat multi-selection
/// of individual questions across them. The selection carries denormalized
/// data so the interview runner is self-sufficient once handed off.
pub struct QuestionSelector {
    store: Arc<dyn DocumentStore>,
    sets: Vec<QuestionSet>,
    selected: Vec<QuestionItem>,
}

impl QuestionSelector {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            sets: Vec::new(),
            selected: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.sets = self.store.list_question_sets().await?;
        Ok(())
    }

    pub fn sets(&self) -> &[QuestionSet] {
        &self.sets
    }

    pub fn selection(&self) -> &[QuestionItem] {
        &self.selected
    }

    /// Job titles for the filter dropdown, first-seen order, no duplicates.
    pub fn unique_job_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = Vec::new();
        for set in &self.sets {
            if !titles.contains(&set.job_title) {
                titles.push(set.job_title.clone());
            }
        }
        titles
    }

    /// The sets to render: exact job-title filter, then the chosen sort.
    pub fn visible_sets(&self, job_title: Option<&str>, sort: SortOption) -> Vec<&QuestionSet> {
        let mut result: Vec<&QuestionSet> = self
            .sets
            .iter()
            .filter(|set| job_title.map_or(true, |title| set.job_title == title))
            .collect();
        match sort {
            SortOption::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOption::Oldest => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOption::JobTitle => result.sort_by(|a, b| a.job_title.cmp(&b.job_title)),
        }
        result
    }

    fn item_id(set_id: &str, index: usize) -> String {
        format!("{set_id}-{index}")
    }

    pub fn is_selected(&self, set_id: &str, index: usize) -> bool {
        let id = Self::item_id(set_id, index);
        self.selected.iter().any(|item| item.id == id)
    }

    /// Adds or removes one question from the selection.
    pub fn toggle(&mut self, set_id: &str, index: usize) {
        let Some(set) = self.sets.iter().find(|s| s.id == set_id) else {
            return;
        };
        let Some(question) = set.questions.get(index) else {
            return;
        };

        let id = Self::item_id(set_id, index);
        if let Some(pos) = self.selected.iter().position(|item| item.id == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(QuestionItem {
                id,
                set_id: set.id.clone(),
                job_title: set.job_title.clone(),
                question: question.clone(),
                timestamp: set.created_at,
            });
        }
    }

    pub fn select_all_state(&self, set_id: &str) -> SelectAllState {
        let Some(set) = self.sets.iter().find(|s| s.id == set_id) else {
            return SelectAllState::Unchecked;
        };
        let selected = (0..set.questions.len())
            .filter(|&i| self.is_selected(set_id, i))
            .count();
        if selected == 0 {
            SelectAllState::Unchecked
        } else if selected == set.questions.len() {
            SelectAllState::Checked
        } else {
            SelectAllState::Indeterminate
        }
    }

    /// The per-set select-all control: checks every question in the set or
    /// clears them all.
    pub fn set_select_all(&mut self, set_id: &str, checked: bool) {
        let Some(set) = self.sets.iter().find(|s| s.id == set_id) else {
            return;
        };
        let count = set.questions.len();
        for index in 0..count {
            let selected = self.is_selected(set_id, index);
            if checked && !selected {
                self.toggle(set_id, index);
            } else if !checked && selected {
                self.toggle(set_id, index);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Serializes the selection into the session store for the interview
    /// runner. The hand-off is by value; later edits to the sets do not
    /// affect an already-started run.
    pub fn start_mock_interview(&self, session: &dyn SessionStore) -> Result<()> {
        if self.selected.is_empty() {
            return Err(QuestionError::EmptySelection);
        }
        let payload = serde_json::to_string(&self.selected)
            .map_err(|e| QuestionError::Generation(e.into()))?;
        session.put(SESSION_KEY_QUESTIONS, payload);
        info!(
            "🎬 Starting mock interview with {} questions",
            self.selected.len()
        );
        Ok(())
    }

    /// Deletes one question from durable storage. Destructive; callers show
    /// a blocking confirmation first. Deleting the last question deletes the
    /// whole set.
    pub async fn delete_question(&mut self, set_id: &str, index: usize) -> Result<()> {
        let set = self.store.get_question_set(set_id).await?;
        if index >= set.questions.len() {
            return Ok(());
        }
        if set.questions.len() == 1 {
            return self.delete_set(set_id).await;
        }

        let mut questions = set.questions;
        questions.remove(index);
        self.store
            .update_question_set(set_id, questions.clone())
            .await?;
        if let Some(local) = self.sets.iter_mut().find(|s| s.id == set_id) {
            local.questions = questions;
        }
        // Selection indices into this set are stale after the rewrite.
        self.selected.retain(|item| item.set_id != set_id);
        Ok(())
    }

    /// Deletes a whole set from durable storage. Destructive; callers show a
    /// blocking confirmation first.
    pub async fn delete_set(&mut self, set_id: &str) -> Result<()> {
        self.store.delete_question_set(set_id).await?;
        self.sets.retain(|s| s.id != set_id);
        self.selected.retain(|item| item.set_id != set_id);
        info!("🗑️ Deleted question set {}", set_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionSet;
    use crate::store::{MemorySession, MemoryStore};
    use chrono::{Duration, Utc};

    async fn seeded_selector() -> (QuestionSelector, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let base = Utc::now();
        for (i, (title, questions)) in [
            ("Backend Engineer", vec!["Q1", "Q2", "Q3"]),
            ("Data Analyst", vec!["D1"]),
            ("Backend Engineer", vec!["Q4"]),
        ]
        .into_iter()
        .enumerate()
        {
            store
                .create_question_set(QuestionSet {
                    id: format!("set-{i}"),
                    job_title: title.into(),
                    experience_level: "mid-level".into(),
                    interview_type: "technical".into(),
                    industry: String::new(),
                    questions: questions.into_iter().map(String::from).collect(),
                    created_at: base + Duration::seconds(i as i64),
                    owner_id: None,
                })
                .await
                .unwrap();
        }
        let mut selector = QuestionSelector::new(store.clone());
        selector.load().await.unwrap();
        (selector, store)
    }

    #[tokio::test]
    async fn filter_and_sort() {
        let (selector, _) = seeded_selector().await;

        let backend = selector.visible_sets(Some("Backend Engineer"), SortOption::Newest);
        assert_eq!(backend.len(), 2);
        assert_eq!(backend[0].id, "set-2");

        let oldest = selector.visible_sets(None, SortOption::Oldest);
        assert_eq!(oldest[0].id, "set-0");

        let alphabetical = selector.visible_sets(None, SortOption::JobTitle);
        assert_eq!(alphabetical.last().unwrap().job_title, "Data Analyst");

        assert_eq!(
            selector.unique_job_titles(),
            vec!["Backend Engineer", "Data Analyst"]
        );
    }

    #[tokio::test]
    async fn select_all_walks_through_tri_state() {
        let (mut selector, _) = seeded_selector().await;
        assert_eq!(selector.select_all_state("set-0"), SelectAllState::Unchecked);

        selector.set_select_all("set-0", true);
        assert_eq!(selector.select_all_state("set-0"), SelectAllState::Checked);

        selector.toggle("set-0", 1);
        assert_eq!(
            selector.select_all_state("set-0"),
            SelectAllState::Indeterminate
        );

        selector.toggle("set-0", 0);
        selector.toggle("set-0", 2);
        assert_eq!(selector.select_all_state("set-0"), SelectAllState::Unchecked);
    }

    #[tokio::test]
    async fn selection_is_flat_ordered_and_denormalized() {
        let (mut selector, _) = seeded_selector().await;
        selector.toggle("set-1", 0);
        selector.toggle("set-0", 2);

        let selection = selector.selection();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection[0].id, "set-1-0");
        assert_eq!(selection[0].job_title, "Data Analyst");
        assert_eq!(selection[1].question, "Q3");
    }

    #[tokio::test]
    async fn start_requires_a_selection_and_hands_off_by_value() {
        let (mut selector, _) = seeded_selector().await;
        let session = MemorySession::new();

        assert!(matches!(
            selector.start_mock_interview(&session),
            Err(QuestionError::EmptySelection)
        ));

        selector.toggle("set-0", 0);
        selector.start_mock_interview(&session).unwrap();

        let payload = session.get(SESSION_KEY_QUESTIONS).unwrap();
        let items: Vec<QuestionItem> = serde_json::from_str(&payload).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].question, "Q1");

        // Mutating the set afterwards must not change the handed-off run.
        selector.delete_set("set-0").await.unwrap();
        let unchanged: Vec<QuestionItem> =
            serde_json::from_str(&session.get(SESSION_KEY_QUESTIONS).unwrap()).unwrap();
        assert_eq!(unchanged[0].question, "Q1");
    }

    #[tokio::test]
    async fn deleting_one_of_several_preserves_order() {
        let (mut selector, store) = seeded_selector().await;
        selector.delete_question("set-0", 1).await.unwrap();

        let set = store.get_question_set("set-0").await.unwrap();
        assert_eq!(set.questions, vec!["Q1", "Q3"]);
    }

    #[tokio::test]
    async fn deleting_the_last_question_cascades_to_the_set() {
        let (mut selector, store) = seeded_selector().await;
        selector.delete_question("set-1", 0).await.unwrap();

        assert!(store.get_question_set("set-1").await.is_err());
        // The title came only from that set, so the filter list drops it.
        assert_eq!(selector.unique_job_titles(), vec!["Backend Engineer"]);
    }
}
