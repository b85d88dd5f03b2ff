//! The server-side enforcement gate.
//!
//! Every protected operation passes through one linear check:
//!
//!   Credentials → Identity → User/Role → Requirement → [operation]
//!
//! The operation closure given to `Gate::guard` is only reachable after all
//! three checks pass and the decision has been audited. A rejection at any
//! stage is terminal for the request; there is no partial authorization.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use volunteerflow_contracts::{
    access::{AccessDecision, AccessRecord, GateOutcome, GateStage, Requirement},
    error::{FlowError, FlowResult},
    role::Role,
    user::{Credentials, RequestId, User},
};

use crate::traits::{AuditWriter, Authorizer, IdentityProvider, UserDirectory};

/// One request as the gate sees it.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    pub request_id: &'a RequestId,
    /// Route label, e.g. `"POST /api/positions"`. Used in logs and audit.
    pub operation: &'a str,
    pub credentials: Option<&'a Credentials>,
    pub requirement: &'a Requirement,
}

/// A caller that passed every gate check.
#[derive(Debug, Clone)]
pub struct Admitted {
    pub request_id: RequestId,
    pub user: User,
    pub role: Role,
}

/// The trust boundary in front of every protected handler.
///
/// Holds the identity and directory collaborators, the shared authorizer, and
/// the audit sink. Cheap to clone; one gate is shared by all routes.
#[derive(Clone)]
pub struct Gate {
    identity: Arc<dyn IdentityProvider>,
    directory: Arc<dyn UserDirectory>,
    authorizer: Arc<dyn Authorizer>,
    audit: Arc<dyn AuditWriter>,
}

impl Gate {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        directory: Arc<dyn UserDirectory>,
        authorizer: Arc<dyn Authorizer>,
        audit: Arc<dyn AuditWriter>,
    ) -> Self {
        Self { identity, directory, authorizer, audit }
    }

    /// The authorizer this gate evaluates against.
    pub fn authorizer(&self) -> &Arc<dyn Authorizer> {
        &self.authorizer
    }

    /// Resolve the caller's user record without evaluating any requirement.
    ///
    /// Used by the "who am I" endpoint: a user without a role still gets
    /// its own profile back. A missing identity is `Unauthenticated`; an
    /// identity with no stored record is `NoRole`.
    pub fn identify(&self, credentials: Option<&Credentials>) -> FlowResult<User> {
        let identity = self.identity.resolve(credentials)?.ok_or(FlowError::Unauthenticated)?;
        self.directory
            .find_user(&identity.subject)?
            .ok_or(FlowError::NoRole { subject: identity.subject })
    }

    /// Run the full check for `request`.
    ///
    /// # Pipeline
    ///
    /// 1. Resolve identity; none → `Unauthenticated`
    /// 2. Resolve user and role; no record or no recognized role → `NoRole`
    /// 3. Evaluate the requirement; deny → `Forbidden`
    /// 4. Audit `Admitted` and return the caller
    ///
    /// Every path, including collaborator failures, writes exactly one audit
    /// record. If that write fails the request is rejected with
    /// `AuditWriteFailed`.
    pub fn check(&self, request: GateRequest<'_>) -> FlowResult<Admitted> {
        let request_id = request.request_id;
        debug!(
            request_id = %request_id,
            operation = request.operation,
            requirement = %request.requirement,
            "gate check starting"
        );

        // ── Stage 1: identity ────────────────────────────────────────────────
        let identity = match self.identity.resolve(request.credentials) {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                warn!(
                    request_id = %request_id,
                    operation = request.operation,
                    "rejected: no authenticated identity"
                );
                self.record(request, None, None, GateStage::Unauthenticated, GateOutcome::RejectedUnauthenticated)?;
                return Err(FlowError::Unauthenticated);
            }
            Err(e) => {
                return Err(self.collaborator_failure(request, None, GateStage::Unauthenticated, e));
            }
        };

        // ── Stage 2: role ────────────────────────────────────────────────────
        let user = match self.directory.find_user(&identity.subject) {
            Ok(user) => user,
            Err(e) => {
                return Err(self.collaborator_failure(
                    request,
                    Some(&identity.subject),
                    GateStage::AuthenticatedNoRole,
                    e,
                ));
            }
        };
        let Some((user, role)) = user.and_then(|u| u.parsed_role().map(|r| (u, r))) else {
            warn!(
                request_id = %request_id,
                operation = request.operation,
                subject = %identity.subject,
                "rejected: identity has no recognized role"
            );
            self.record(
                request,
                Some(&identity.subject),
                None,
                GateStage::AuthenticatedNoRole,
                GateOutcome::RejectedNoRole,
            )?;
            return Err(FlowError::NoRole { subject: identity.subject });
        };

        // ── Stage 3: requirement ─────────────────────────────────────────────
        match self.authorizer.decide(Some(&user), request.requirement) {
            AccessDecision::Deny { reason } => {
                warn!(
                    request_id = %request_id,
                    operation = request.operation,
                    subject = %user.id,
                    role = %role,
                    reason = %reason,
                    "rejected: insufficient privilege"
                );
                self.record(
                    request,
                    Some(&user.id),
                    Some(role),
                    GateStage::Authorized,
                    GateOutcome::RejectedForbidden { reason },
                )?;
                Err(FlowError::Forbidden { requirement: request.requirement.to_string() })
            }
            AccessDecision::Allow => {
                self.record(request, Some(&user.id), Some(role), GateStage::Authorized, GateOutcome::Admitted)?;
                info!(
                    request_id = %request_id,
                    operation = request.operation,
                    subject = %user.id,
                    role = %role,
                    "request admitted"
                );
                Ok(Admitted { request_id: request_id.clone(), user, role })
            }
        }
    }

    /// Check `request`, then run `operation` with the admitted caller.
    ///
    /// `operation` never runs when the check fails. The gate does not inspect
    /// or modify what the operation returns.
    pub fn guard<T>(
        &self,
        request: GateRequest<'_>,
        operation: impl FnOnce(&Admitted) -> FlowResult<T>,
    ) -> FlowResult<T> {
        let admitted = self.check(request)?;
        operation(&admitted)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn record(
        &self,
        request: GateRequest<'_>,
        subject: Option<&str>,
        role: Option<Role>,
        stage: GateStage,
        outcome: GateOutcome,
    ) -> FlowResult<()> {
        let record = AccessRecord {
            request_id: request.request_id.to_string(),
            operation: request.operation.to_string(),
            subject: subject.map(str::to_string),
            role,
            requirement: request.requirement.clone(),
            stage,
            outcome,
            timestamp: Utc::now(),
        };
        self.audit.write(&record)
    }

    /// Log and audit a collaborator failure. Never grants access.
    fn collaborator_failure(
        &self,
        request: GateRequest<'_>,
        subject: Option<&str>,
        stage: GateStage,
        cause: FlowError,
    ) -> FlowError {
        error!(
            request_id = %request.request_id,
            operation = request.operation,
            error = %cause,
            "collaborator failed during gate check"
        );
        let outcome = GateOutcome::Failed { reason: cause.to_string() };
        match self.record(request, subject, None, stage, outcome) {
            Ok(()) => cause,
            Err(audit_err) => audit_err,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
