//! Role-specific dashboards.

use serde::Serialize;

use volunteerflow_contracts::{role::Role, section::Section};
use volunteerflow_rbac::PermissionEvaluator;

use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: &'static str,
    pub description: &'static str,
    pub role_badge: &'static str,
    pub quick_actions: Vec<QuickAction>,
}

const fn action(label: &'static str, href: &'static str) -> QuickAction {
    QuickAction { label, href }
}

fn template(role: Role) -> (&'static str, &'static str, [QuickAction; 3]) {
    match role {
        Role::Recruiter => (
            "Recruiter Dashboard",
            "Manage leads, applications, and recruitment pipeline",
            [action("View Leads", "/leads"), action("Applications", "/applications"), action("Reports", "/reports")],
        ),
        Role::PlacementOfficer => (
            "Placement Officer Dashboard",
            "Manage volunteer placements and assignments",
            [action("Placements", "/placements"), action("Applications", "/applications"), action("Reports", "/reports")],
        ),
        Role::MedicalScreener => (
            "Medical Screener Dashboard",
            "Conduct medical evaluations and health assessments",
            [
                action("Medical Screening", "/medical-screening"),
                action("Appointments", "/appointments"),
                action("Medical Files", "/medical-files"),
            ],
        ),
        Role::CountryOfficer => (
            "Country Officer Dashboard",
            "Manage in-country operations and position requirements",
            [action("Positions", "/positions"), action("Placements", "/placements"), action("Country Reports", "/reports")],
        ),
    }
}

/// The dashboard for the signed-in user, or `None` while loading, when
/// signed out, or without a role.
///
/// Quick actions are kept only when they point at a section the role can
/// view. Links outside the section list are dropped.
pub fn dashboard_for(evaluator: &PermissionEvaluator, session: &SessionState) -> Option<Dashboard> {
    let role = session.role()?;
    let user = session.user();
    let (title, description, actions) = template(role);

    let quick_actions = actions
        .into_iter()
        .filter(|a| {
            Section::from_path(a.href).is_some_and(|s| evaluator.has_capability(user, s.view_capability()))
        })
        .collect();

    Some(Dashboard { title, description, role_badge: role.display_name(), quick_actions })
}
