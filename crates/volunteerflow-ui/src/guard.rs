//! Declarative render guard.
//!
//! Mirrors the server gate for rendering only. Nothing here is a security
//! boundary: the server rejects the same requests regardless of what the
//! client shows.

use volunteerflow_contracts::{capability::Capability, role::Role};
use volunteerflow_rbac::PermissionEvaluator;

use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Identity still loading. Render nothing.
    Pending,
    /// Render the fallback.
    Denied,
    /// Render the children.
    Granted,
}

/// Required capabilities (all) and roles (any). Both empty means any
/// signed-in user with a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityGuard {
    capabilities: Vec<Capability>,
    roles: Vec<Role>,
}

impl CapabilityGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requires(capability: Capability) -> Self {
        Self::new().and_capability(capability)
    }

    pub fn and_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn for_roles(mut self, roles: &[Role]) -> Self {
        self.roles.extend_from_slice(roles);
        self
    }

    /// Roles are checked before capabilities; a user without a role is
    /// always denied.
    pub fn evaluate(&self, evaluator: &PermissionEvaluator, session: &SessionState) -> GuardOutcome {
        if session.is_loading() {
            return GuardOutcome::Pending;
        }
        let user = session.user();
        if session.role().is_none() {
            return GuardOutcome::Denied;
        }
        if !evaluator.has_any_role(user, &self.roles) {
            return GuardOutcome::Denied;
        }
        if !evaluator.has_all_capabilities(user, &self.capabilities) {
            return GuardOutcome::Denied;
        }
        GuardOutcome::Granted
    }

    /// `children` when granted, `fallback` when denied, nothing while loading.
    pub fn render<T>(
        &self,
        evaluator: &PermissionEvaluator,
        session: &SessionState,
        children: T,
        fallback: Option<T>,
    ) -> Option<T> {
        match self.evaluate(evaluator, session) {
            GuardOutcome::Pending => None,
            GuardOutcome::Denied => fallback,
            GuardOutcome::Granted => Some(children),
        }
    }
}
