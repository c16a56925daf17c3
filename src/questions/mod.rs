pub mod generator;
pub mod selector;

pub use generator::{GeneratedQuestion, GeneratorForm, QuestionGenerator};
pub use selector::{QuestionSelector, SelectAllState, SortOption};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuestionError {
    #[error("Job title is required")]
    MissingJobTitle,
    #[error("Question text is required")]
    MissingQuestionText,
    #[error("Cannot save an empty question list")]
    NoQuestions,
    #[error("No questions selected")]
    EmptySelection,
    #[error("The response contained no questions")]
    EmptyResponse,
    #[error("AI generation failed: {0}")]
    Generation(#[from] anyhow::Error),
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}

pub type Result<T> = std::result::Result<T, QuestionError>;
