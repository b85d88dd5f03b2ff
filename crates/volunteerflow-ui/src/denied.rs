//! The access-restricted message.

use serde::Serialize;

use volunteerflow_contracts::user::User;
use volunteerflow_rbac::PermissionEvaluator;

pub const DEFAULT_TITLE: &str = "Access Restricted";
pub const DEFAULT_MESSAGE: &str =
    "You don't have permission to access this section. Contact your administrator if you need access.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDenied {
    pub title: String,
    pub message: String,
    /// A section the user can reach instead. `None` hides the back link.
    pub back_path: Option<String>,
}

impl Default for AccessDenied {
    fn default() -> Self {
        Self { title: DEFAULT_TITLE.to_string(), message: DEFAULT_MESSAGE.to_string(), back_path: None }
    }
}

impl AccessDenied {
    /// Default texts with a back link to the user's first visible section.
    pub fn for_user(evaluator: &PermissionEvaluator, user: Option<&User>) -> Self {
        let back_path = evaluator.visible_sections(user).first().map(|s| s.path());
        Self { back_path, ..Self::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
