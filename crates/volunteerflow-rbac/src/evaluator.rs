//! The permission evaluator.
//!
//! Pure functions of (user, table). No I/O, no locking, no error path:
//! anything absent or malformed evaluates to "no access".

use std::sync::Arc;

use tracing::debug;

use volunteerflow_contracts::{
    capability::{Capability, CapabilitySet},
    role::Role,
    section::Section,
    user::User,
};
use volunteerflow_core::traits::Authorizer;

use crate::table::PermissionTable;

/// Answers authorization questions against one shared `PermissionTable`.
///
/// Cloning shares the table. Both the server gate (through `Authorizer`)
/// and the client gate hold clones of the same evaluator.
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    table: Arc<PermissionTable>,
}

impl PermissionEvaluator {
    pub fn new(table: Arc<PermissionTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    /// `false` if the user is absent or has no recognized role; otherwise
    /// the table entry.
    pub fn has_capability(&self, user: Option<&User>, capability: Capability) -> bool {
        let granted = user
            .and_then(User::parsed_role)
            .is_some_and(|role| self.table.lookup(role, capability));
        debug!(
            subject = user.map(|u| u.id.as_str()).unwrap_or("anonymous"),
            capability = %capability,
            granted,
            "capability check"
        );
        granted
    }

    /// AND over `has_capability`. An empty list passes for any user.
    pub fn has_all_capabilities(&self, user: Option<&User>, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.has_capability(user, *c))
    }

    /// True if `roles` is empty or the user's role is one of them.
    pub fn has_any_role(&self, user: Option<&User>, roles: &[Role]) -> bool {
        roles.is_empty()
            || user
                .and_then(User::parsed_role)
                .is_some_and(|role| roles.contains(&role))
    }

    /// Sections the user may view, in canonical order.
    ///
    /// The first entry is the default landing page.
    pub fn visible_sections(&self, user: Option<&User>) -> Vec<Section> {
        Section::CANONICAL
            .into_iter()
            .filter(|s| self.has_capability(user, s.view_capability()))
            .collect()
    }

    /// Path of the first visible section, or `/` when there is none.
    pub fn landing_path(&self, user: Option<&User>) -> String {
        self.visible_sections(user)
            .first()
            .map(|s| s.path())
            .unwrap_or_else(|| "/".to_string())
    }

    /// Every capability the user effectively holds.
    pub fn capabilities(&self, user: Option<&User>) -> CapabilitySet {
        user.and_then(User::parsed_role)
            .map(|role| self.table.capabilities(role))
            .unwrap_or_default()
    }
}

impl Authorizer for PermissionEvaluator {
    fn has_capability(&self, user: Option<&User>, capability: Capability) -> bool {
        PermissionEvaluator::has_capability(self, user, capability)
    }

    fn has_all_capabilities(&self, user: Option<&User>, capabilities: &[Capability]) -> bool {
        PermissionEvaluator::has_all_capabilities(self, user, capabilities)
    }

    fn has_any_role(&self, user: Option<&User>, roles: &[Role]) -> bool {
        PermissionEvaluator::has_any_role(self, user, roles)
    }
}
