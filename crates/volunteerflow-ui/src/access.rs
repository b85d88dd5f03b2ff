//! Role-access flags for the signed-in user.

use serde::Serialize;

use volunteerflow_contracts::{
    capability::{Capability, CapabilitySet},
    role::Role,
    user::User,
};
use volunteerflow_rbac::PermissionEvaluator;

/// Shown in place of medical details to roles that may see outcomes only.
pub const MEDICAL_DETAILS_NOTICE: &str = "Detailed medical information is restricted to Medical Screeners only.";

/// A snapshot of what the current user may do, for view code that needs
/// many checks at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAccess {
    role: Option<Role>,
    capabilities: CapabilitySet,
}

impl RoleAccess {
    pub fn for_user(evaluator: &PermissionEvaluator, user: Option<&User>) -> Self {
        Self {
            role: user.and_then(User::parsed_role),
            capabilities: evaluator.capabilities(user),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }

    /// True if the user's role is one of `roles`. No role never matches.
    pub fn check_roles(&self, roles: &[Role]) -> bool {
        self.role.is_some_and(|r| roles.contains(&r))
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
    }

    /// Outcome-only viewers get the restriction notice; screeners and users
    /// who cannot see screenings at all get nothing.
    pub fn medical_details_notice(&self) -> Option<&'static str> {
        (self.can(Capability::ViewMedicalScreenings) && !self.can(Capability::ViewMedicalDetails))
            .then_some(MEDICAL_DETAILS_NOTICE)
    }
}
