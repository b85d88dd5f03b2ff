//! The client's view of who is signed in.

use volunteerflow_contracts::{role::Role, user::User};

/// Identity as the client currently knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The profile request has not returned yet.
    Loading,
    /// Resolved: `None` when nobody is signed in.
    Resolved(Option<User>),
}

impl SessionState {
    pub fn signed_in(user: User) -> Self {
        SessionState::Resolved(Some(user))
    }

    pub fn anonymous() -> Self {
        SessionState::Resolved(None)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Resolved(user) => user.as_ref(),
            SessionState::Loading => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user().and_then(User::parsed_role)
    }
}
