//! Authorization requirements, decisions, and audit records.
//!
//! A `Requirement` is what a check-point declares. The gate resolves the
//! caller, asks the authorizer, and records one `AccessRecord` per decision.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{capability::Capability, role::Role};

/// What a check-point demands of its caller.
///
/// Every listed capability must hold (AND). When `roles` is non-empty the
/// caller's role must be one of them (OR). Both empty means "any caller with
/// a role".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub capabilities: Vec<Capability>,
    pub roles: Vec<Role>,
}

impl Requirement {
    /// No restriction beyond having a role.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn capability(capability: Capability) -> Self {
        Self { capabilities: vec![capability], roles: Vec::new() }
    }

    pub fn all_of(capabilities: &[Capability]) -> Self {
        Self { capabilities: capabilities.to_vec(), roles: Vec::new() }
    }

    pub fn any_role(roles: &[Role]) -> Self {
        Self { capabilities: Vec::new(), roles: roles.to_vec() }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.capabilities.is_empty() && self.roles.is_empty()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrestricted() {
            return f.write_str("unrestricted");
        }
        let mut parts = Vec::new();
        if !self.capabilities.is_empty() {
            let caps: Vec<&str> = self.capabilities.iter().map(|c| c.as_str()).collect();
            parts.push(format!("all of [{}]", caps.join(", ")));
        }
        if !self.roles.is_empty() {
            let roles: Vec<&str> = self.roles.iter().map(|r| r.as_str()).collect();
            parts.push(format!("any role of [{}]", roles.join(", ")));
        }
        f.write_str(&parts.join(" and "))
    }
}

/// The authorizer's answer for one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDecision {
    Allow,
    Deny {
        /// Human-readable explanation, written to the audit log.
        reason: String,
    },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// How far a request progressed through the gate.
///
/// Progression is strictly linear. A rejection at any stage is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStage {
    /// No identity could be resolved.
    Unauthenticated,
    /// Identity resolved but the user has no recognized role.
    AuthenticatedNoRole,
    /// Role resolved; the requirement was evaluated.
    Authorized,
}

/// Final outcome of one gate check, as recorded in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    Admitted,
    RejectedUnauthenticated,
    RejectedNoRole,
    RejectedForbidden { reason: String },
    Failed { reason: String },
}

/// An immutable record of one gate decision.
///
/// Every check, admitted or not, produces exactly one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub request_id: String,
    /// Route label or operation name, e.g. `"POST /api/positions"`.
    pub operation: String,
    /// Resolved subject, if the request got that far.
    pub subject: Option<String>,
    /// Parsed role, if any.
    pub role: Option<Role>,
    pub requirement: Requirement,
    /// Last stage reached before the outcome was decided.
    pub stage: GateStage,
    pub outcome: GateOutcome,
    pub timestamp: DateTime<Utc>,
}
