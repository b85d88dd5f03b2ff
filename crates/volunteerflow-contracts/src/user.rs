//! Identity and user types.
//!
//! These are consumed, never owned: the identity collaborator resolves an
//! `Identity` from request `Credentials`, and the user directory turns that
//! identity into a `User`. The access core only reads them.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Opaque credentials presented with a request (a session token).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credentials(pub String);

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

/// An authenticated subject as reported by the identity collaborator.
///
/// Carries no authorization data. The role is looked up separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable subject identifier (the user record's `id`).
    pub subject: String,
    pub email: Option<String>,
}

/// A staff member as stored by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Raw role string as stored. May be absent or unrecognized.
    pub role: Option<String>,
}

impl User {
    /// Build a user with the given role and no profile fields.
    pub fn with_role(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: None,
            first_name: None,
            last_name: None,
            role: Some(role.as_str().to_string()),
        }
    }

    /// Build a user that has no role assigned.
    pub fn without_role(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            first_name: None,
            last_name: None,
            role: None,
        }
    }

    /// The parsed role, or `None` when absent or not one of the known roles.
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// "First Last", falling back to the email, then to "User".
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.email.clone().unwrap_or_else(|| "User".to_string()),
        }
    }
}

/// Unique identifier for a single request passing through the gate.
///
/// Appears in every audit record and every tracing event the gate emits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    /// Create a new, unique request ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
