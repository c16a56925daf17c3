use serde::{Deserialize, Serialize};

/// Per-request session context, passed explicitly into every component that
/// gates an action on sign-in state or stamps ownership on a record. The
/// identity provider that produced the user id lives outside this crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppContext {
    pub user_id: Option<String>,
}

impl AppContext {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// Save-type actions are only offered to signed-in users.
    pub fn can_save(&self) -> bool {
        self.user_id.is_some()
    }
}
