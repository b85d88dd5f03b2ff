//! Navigation guard and sidebar.
//!
//! A section route the user cannot view redirects to the first section
//! they can view, or to `/` when there is none. That target is always
//! viewable (or is `/`, which is never guarded), so following a redirect
//! never produces a second one.

use serde::Serialize;
use tracing::debug;

use volunteerflow_contracts::section::Section;
use volunteerflow_rbac::PermissionEvaluator;

use crate::session::SessionState;

pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Identity still loading. Show a spinner, decide later.
    Pending,
    /// Render the page. `read_only` hides create/edit/delete actions.
    Render { path: String, read_only: bool },
    Redirect { to: String },
    NotFound,
}

#[derive(Debug, Clone)]
pub struct NavigationGuard {
    evaluator: PermissionEvaluator,
}

impl NavigationGuard {
    pub fn new(evaluator: PermissionEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn resolve(&self, session: &SessionState, path: &str) -> Navigation {
        if session.is_loading() {
            return Navigation::Pending;
        }
        let user = session.user();

        if path == HOME_PATH || path.is_empty() {
            return Navigation::Render { path: HOME_PATH.to_string(), read_only: false };
        }
        let Some(section) = Section::from_path(path) else {
            return Navigation::NotFound;
        };

        if !self.evaluator.has_capability(user, section.view_capability()) {
            let to = self.evaluator.landing_path(user);
            debug!(
                subject = user.map(|u| u.id.as_str()).unwrap_or("anonymous"),
                from = path,
                to = %to,
                "section not viewable; redirecting"
            );
            return Navigation::Redirect { to };
        }

        let read_only = !section
            .manage_capability()
            .is_some_and(|manage| self.evaluator.has_capability(user, manage));
        Navigation::Render { path: section.path(), read_only }
    }

    /// Sidebar entries. Dashboard is always first for a signed-in user;
    /// sections follow in canonical order when viewable.
    pub fn sidebar(&self, session: &SessionState) -> Vec<NavItem> {
        let Some(user) = session.user() else {
            return Vec::new();
        };

        std::iter::once(NavItem { name: "Dashboard", href: HOME_PATH.to_string() })
            .chain(
                self.evaluator
                    .visible_sections(Some(user))
                    .into_iter()
                    .map(|section| NavItem { name: nav_label(section), href: section.path() }),
            )
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: String,
}

pub fn nav_label(section: Section) -> &'static str {
    match section {
        Section::Leads => "Lead Management",
        Section::Positions => "Positions",
        Section::Applications => "Applications",
        Section::MedicalScreening => "Medical Screening",
        Section::Placements => "Placements",
        Section::Reports => "Reports",
    }
}
