pub mod dashboard;
pub mod generator;

pub use dashboard::{DashboardEntry, FeedbackDashboard};
pub use generator::{FeedbackGenerator, FeedbackProgress};

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum FeedbackError {
    /// No interview id in the session; the caller redirects back to the
    /// interview page.
    #[error("No interview to evaluate")]
    NoInterview,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, FeedbackError>;
