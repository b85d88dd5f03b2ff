//! The role-permission table.
//!
//! One static definition, shared by the server gate and the client gate.
//! Every role states every capability explicitly; there are no implicit
//! defaults. The only fallback is for role strings outside the enumeration,
//! which hold nothing.

use serde::Serialize;

use volunteerflow_contracts::{
    capability::{Capability, CapabilitySet},
    role::Role,
};

/// The full capability row for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissions {
    pub can_view_leads: bool,
    pub can_manage_leads: bool,
    pub can_view_positions: bool,
    pub can_manage_positions: bool,
    pub can_view_applications: bool,
    pub can_manage_applications: bool,
    /// Outcome-only view.
    pub can_view_medical_screenings: bool,
    pub can_manage_medical_screenings: bool,
    /// Restricted medical history and clearance reasoning.
    pub can_view_medical_details: bool,
    pub can_view_placements: bool,
    pub can_manage_placements: bool,
    pub can_view_reports: bool,
}

impl RolePermissions {
    /// Read the flag for `capability`.
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewLeads => self.can_view_leads,
            Capability::ManageLeads => self.can_manage_leads,
            Capability::ViewPositions => self.can_view_positions,
            Capability::ManagePositions => self.can_manage_positions,
            Capability::ViewApplications => self.can_view_applications,
            Capability::ManageApplications => self.can_manage_applications,
            Capability::ViewMedicalScreenings => self.can_view_medical_screenings,
            Capability::ManageMedicalScreenings => self.can_manage_medical_screenings,
            Capability::ViewMedicalDetails => self.can_view_medical_details,
            Capability::ViewPlacements => self.can_view_placements,
            Capability::ManagePlacements => self.can_manage_placements,
            Capability::ViewReports => self.can_view_reports,
        }
    }
}

const RECRUITER: RolePermissions = RolePermissions {
    can_view_leads: true,
    can_manage_leads: true,
    can_view_positions: true,
    can_manage_positions: false,
    can_view_applications: true,
    can_manage_applications: true,
    can_view_medical_screenings: true,
    can_manage_medical_screenings: false,
    can_view_medical_details: false,
    can_view_placements: true,
    can_manage_placements: false,
    can_view_reports: true,
};

const PLACEMENT_OFFICER: RolePermissions = RolePermissions {
    can_view_leads: true,
    can_manage_leads: false,
    can_view_positions: true,
    can_manage_positions: false,
    can_view_applications: true,
    can_manage_applications: true,
    can_view_medical_screenings: true,
    can_manage_medical_screenings: false,
    can_view_medical_details: false,
    can_view_placements: true,
    can_manage_placements: true,
    can_view_reports: true,
};

const MEDICAL_SCREENER: RolePermissions = RolePermissions {
    can_view_leads: false,
    can_manage_leads: false,
    can_view_positions: false,
    can_manage_positions: false,
    can_view_applications: true,
    can_manage_applications: false,
    can_view_medical_screenings: true,
    can_manage_medical_screenings: true,
    can_view_medical_details: true,
    can_view_placements: false,
    can_manage_placements: false,
    can_view_reports: false,
};

// Demand side: creates positions.
const COUNTRY_OFFICER: RolePermissions = RolePermissions {
    can_view_leads: false,
    can_manage_leads: false,
    can_view_positions: true,
    can_manage_positions: true,
    can_view_applications: true,
    can_manage_applications: false,
    can_view_medical_screenings: true,
    can_manage_medical_screenings: false,
    can_view_medical_details: false,
    can_view_placements: true,
    can_manage_placements: true,
    can_view_reports: true,
};

/// Total mapping Role → (Capability → bool).
///
/// Construct once at startup with `standard()`, wrap in an `Arc`, and hand
/// the same value to every enforcement point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionTable {
    recruiter: RolePermissions,
    placement_officer: RolePermissions,
    medical_screener: RolePermissions,
    country_officer: RolePermissions,
}

impl PermissionTable {
    /// The production table.
    pub const fn standard() -> Self {
        Self {
            recruiter: RECRUITER,
            placement_officer: PLACEMENT_OFFICER,
            medical_screener: MEDICAL_SCREENER,
            country_officer: COUNTRY_OFFICER,
        }
    }

    /// The full row for `role`.
    pub fn permissions(&self, role: Role) -> &RolePermissions {
        match role {
            Role::Recruiter => &self.recruiter,
            Role::PlacementOfficer => &self.placement_officer,
            Role::MedicalScreener => &self.medical_screener,
            Role::CountryOfficer => &self.country_officer,
        }
    }

    pub fn lookup(&self, role: Role, capability: Capability) -> bool {
        self.permissions(role).grants(capability)
    }

    /// Look up by stored role string. Unknown roles hold no capabilities.
    pub fn lookup_named(&self, role: &str, capability: Capability) -> bool {
        role.parse::<Role>()
            .map(|r| self.lookup(r, capability))
            .unwrap_or(false)
    }

    /// Every capability `role` holds.
    pub fn capabilities(&self, role: Role) -> CapabilitySet {
        Capability::ALL
            .into_iter()
            .filter(|c| self.lookup(role, *c))
            .collect()
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}
