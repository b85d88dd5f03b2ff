//! Error types for the VolunteerFlow access core.
//!
//! All fallible operations return `FlowResult<T>`. The first three variants
//! form the authorization family and are always decided at the gate; the
//! rest are ordinary request or collaborator failures.

use thiserror::Error;

/// The unified error type for VolunteerFlow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// No identity could be resolved from the request.
    #[error("authentication required")]
    Unauthenticated,

    /// The identity resolved but the user has no recognized role.
    #[error("user '{subject}' has no recognized role")]
    NoRole { subject: String },

    /// The caller's role does not satisfy the requirement.
    #[error("access restricted: requires {requirement}")]
    Forbidden { requirement: String },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    /// A request body failed schema or rule validation.
    #[error("validation failed: {reason}")]
    ValidationFailed { reason: String },

    /// The audit writer could not persist a gate decision.
    ///
    /// Fatal for the request: a decision that cannot be audited is not acted on.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// An external collaborator (identity provider, directory, store) failed.
    #[error("collaborator failure: {reason}")]
    Collaborator { reason: String },
}

impl FlowError {
    /// True for the authentication/authorization family of errors.
    pub fn is_access_denial(&self) -> bool {
        matches!(
            self,
            FlowError::Unauthenticated | FlowError::NoRole { .. } | FlowError::Forbidden { .. }
        )
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        FlowError::NotFound { resource: resource.to_string(), id: id.to_string() }
    }
}

/// Convenience alias used throughout the VolunteerFlow crates.
pub type FlowResult<T> = Result<T, FlowError>;
