//! Trait seams for the VolunteerFlow trust boundary.
//!
//! - `Authorizer`: trusted evaluator over the static permission table
//! - `IdentityProvider`: external collaborator that authenticates requests
//! - `UserDirectory`: external collaborator holding user records and roles
//! - `AuditWriter`: trusted sink recording every gate decision
//! - `Verifier`: trusted checker for inbound and outbound payloads
//! - `MedicalDetailsSource`: store of the restricted medical sub-records
//!
//! The gate wires the first four together. Handlers never see a request the
//! authorizer did not allow.

use serde_json::Value;

use volunteerflow_contracts::{
    access::{AccessDecision, AccessRecord, Requirement},
    capability::Capability,
    error::FlowResult,
    records::MedicalScreeningDetails,
    role::Role,
    user::{Credentials, Identity, User},
    verify::{PayloadSchema, VerificationReport},
};

/// Answers authorization questions for a (possibly absent) user.
///
/// Implementations must be pure and fail closed: an absent user, a missing
/// role, or an unrecognized role yields `false` for every capability.
pub trait Authorizer: Send + Sync {
    /// True if the user's role grants `capability`.
    fn has_capability(&self, user: Option<&User>, capability: Capability) -> bool;

    /// AND over `has_capability`. An empty list is a vacuous pass.
    fn has_all_capabilities(&self, user: Option<&User>, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.has_capability(user, *c))
    }

    /// Membership test of the user's role. An empty list means no role restriction.
    fn has_any_role(&self, user: Option<&User>, roles: &[Role]) -> bool;

    /// Evaluate a full requirement: all capabilities AND one of the roles.
    fn decide(&self, user: Option<&User>, requirement: &Requirement) -> AccessDecision {
        if !self.has_any_role(user, &requirement.roles) {
            let role = user.and_then(|u| u.role.as_deref()).unwrap_or("none");
            return AccessDecision::Deny {
                reason: format!("role '{role}' is not one of the permitted roles"),
            };
        }
        if let Some(missing) = requirement
            .capabilities
            .iter()
            .find(|c| !self.has_capability(user, **c))
        {
            return AccessDecision::Deny {
                reason: format!("capability '{missing}' is not granted"),
            };
        }
        AccessDecision::Allow
    }
}

/// Resolves request credentials into an authenticated identity.
///
/// `Ok(None)` means "not authenticated". `Err` means the provider itself
/// failed and must never be read as either outcome.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, credentials: Option<&Credentials>) -> FlowResult<Option<Identity>>;
}

/// Looks up the stored user record (and thus the role) for a subject.
pub trait UserDirectory: Send + Sync {
    fn find_user(&self, subject: &str) -> FlowResult<Option<User>>;
}

/// The append-only record of gate decisions.
///
/// A failed write is fatal for the request being decided.
pub trait AuditWriter: Send + Sync {
    fn write(&self, record: &AccessRecord) -> FlowResult<()>;
}

/// Checks a JSON payload against a declarative schema.
pub trait Verifier: Send + Sync {
    fn verify(&self, payload: &Value, schema: &PayloadSchema) -> FlowResult<VerificationReport>;
}

/// Storage of the restricted medical layer, keyed by screening ID.
///
/// Only the redaction policy may call this.
pub trait MedicalDetailsSource: Send + Sync {
    fn medical_details(&self, screening_id: &str) -> FlowResult<Option<MedicalScreeningDetails>>;
}
