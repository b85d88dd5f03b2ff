//! Navigable sections of the application.

use serde::{Deserialize, Serialize};

use crate::capability::Capability;

/// A top-level area of the application, each governed by one "view" capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Leads,
    Positions,
    Applications,
    MedicalScreening,
    Placements,
    Reports,
}

impl Section {
    /// Canonical order. The first visible entry is the default landing page.
    pub const CANONICAL: [Section; 6] = [
        Section::Leads,
        Section::Positions,
        Section::Applications,
        Section::MedicalScreening,
        Section::Placements,
        Section::Reports,
    ];

    /// Section identifier, e.g. `"medical-screening"`.
    pub fn id(self) -> &'static str {
        match self {
            Section::Leads => "leads",
            Section::Positions => "positions",
            Section::Applications => "applications",
            Section::MedicalScreening => "medical-screening",
            Section::Placements => "placements",
            Section::Reports => "reports",
        }
    }

    /// Client route for the section, e.g. `"/placements"`.
    pub fn path(self) -> String {
        format!("/{}", self.id())
    }

    /// The capability a user must hold to see this section at all.
    pub fn view_capability(self) -> Capability {
        match self {
            Section::Leads => Capability::ViewLeads,
            Section::Positions => Capability::ViewPositions,
            Section::Applications => Capability::ViewApplications,
            Section::MedicalScreening => Capability::ViewMedicalScreenings,
            Section::Placements => Capability::ViewPlacements,
            Section::Reports => Capability::ViewReports,
        }
    }

    /// The matching manage capability, when the section has one.
    pub fn manage_capability(self) -> Option<Capability> {
        match self {
            Section::Leads => Some(Capability::ManageLeads),
            Section::Positions => Some(Capability::ManagePositions),
            Section::Applications => Some(Capability::ManageApplications),
            Section::MedicalScreening => Some(Capability::ManageMedicalScreenings),
            Section::Placements => Some(Capability::ManagePlacements),
            Section::Reports => None,
        }
    }

    /// Look up the section served at `path` (exact match, trailing slash ignored).
    pub fn from_path(path: &str) -> Option<Section> {
        let trimmed = path.trim_end_matches('/');
        Section::CANONICAL.into_iter().find(|s| s.path() == trimmed)
    }
}
