//! # volunteerflow-ui
//!
//! Client-side rendering decisions for VolunteerFlow, built on the same
//! [`PermissionEvaluator`](volunteerflow_rbac::PermissionEvaluator) the
//! server gate uses.
//!
//! Everything here decides what to *show*. None of it is enforcement; a
//! hidden button whose route is still called gets the server's 403.
//!
//! - [`guard::CapabilityGuard`]: children, fallback or nothing.
//! - [`navigation::NavigationGuard`]: render, read-only render or redirect.
//! - [`dashboard::dashboard_for`]: role dashboard with filtered quick actions.
//! - [`access::RoleAccess`]: per-user flags and the medical details notice.
//! - [`denied::AccessDenied`]: the access-restricted message.

pub mod access;
pub mod dashboard;
pub mod denied;
pub mod guard;
pub mod navigation;
pub mod session;

pub use access::{RoleAccess, MEDICAL_DETAILS_NOTICE};
pub use dashboard::{dashboard_for, Dashboard, QuickAction};
pub use denied::AccessDenied;
pub use guard::{CapabilityGuard, GuardOutcome};
pub use navigation::{NavItem, Navigation, NavigationGuard, HOME_PATH};
pub use session::SessionState;

// ── Tests ─────────────────────────────────────────────────────────────────────
