//! Staff roles.
//!
//! A role is stored on the user record as a plain string. Parsing is strict:
//! any string outside the closed enumeration yields no role at all, which the
//! evaluator treats as zero capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four staff roles that can hold capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Recruiter,
    PlacementOfficer,
    MedicalScreener,
    CountryOfficer,
}

impl Role {
    /// Every role, in table column order.
    pub const ALL: [Role; 4] = [
        Role::Recruiter,
        Role::PlacementOfficer,
        Role::MedicalScreener,
        Role::CountryOfficer,
    ];

    /// The identifier stored on the user record (e.g. `"placement_officer"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Recruiter => "recruiter",
            Role::PlacementOfficer => "placement_officer",
            Role::MedicalScreener => "medical_screener",
            Role::CountryOfficer => "country_officer",
        }
    }

    /// Human-readable name shown in headers and dashboards.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Recruiter => "Recruiter",
            Role::PlacementOfficer => "Placement Officer",
            Role::MedicalScreener => "Medical Screener",
            Role::CountryOfficer => "Country Officer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored role string is not one of the four known roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
