//! Capability types.
//!
//! Capabilities are atomic, named booleans. There is no hierarchy between
//! them: holding `ManageLeads` says nothing about `ViewLeads` except what the
//! permission table states explicitly.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single permission a role may or may not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    ViewLeads,
    ManageLeads,
    ViewPositions,
    ManagePositions,
    ViewApplications,
    ManageApplications,
    /// Outcome-only view of a medical screening.
    ViewMedicalScreenings,
    ManageMedicalScreenings,
    /// Access to the restricted medical sub-record.
    ViewMedicalDetails,
    ViewPlacements,
    ManagePlacements,
    ViewReports,
}

impl Capability {
    /// Every capability, in table row order.
    pub const ALL: [Capability; 12] = [
        Capability::ViewLeads,
        Capability::ManageLeads,
        Capability::ViewPositions,
        Capability::ManagePositions,
        Capability::ViewApplications,
        Capability::ManageApplications,
        Capability::ViewMedicalScreenings,
        Capability::ManageMedicalScreenings,
        Capability::ViewMedicalDetails,
        Capability::ViewPlacements,
        Capability::ManagePlacements,
        Capability::ViewReports,
    ];

    /// The `(view, manage)` pairs where both variants exist.
    pub const VIEW_MANAGE_PAIRS: [(Capability, Capability); 5] = [
        (Capability::ViewLeads, Capability::ManageLeads),
        (Capability::ViewPositions, Capability::ManagePositions),
        (Capability::ViewApplications, Capability::ManageApplications),
        (Capability::ViewMedicalScreenings, Capability::ManageMedicalScreenings),
        (Capability::ViewPlacements, Capability::ManagePlacements),
    ];

    /// Wire name, e.g. `"viewMedicalDetails"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::ViewLeads => "viewLeads",
            Capability::ManageLeads => "manageLeads",
            Capability::ViewPositions => "viewPositions",
            Capability::ManagePositions => "managePositions",
            Capability::ViewApplications => "viewApplications",
            Capability::ManageApplications => "manageApplications",
            Capability::ViewMedicalScreenings => "viewMedicalScreenings",
            Capability::ManageMedicalScreenings => "manageMedicalScreenings",
            Capability::ViewMedicalDetails => "viewMedicalDetails",
            Capability::ViewPlacements => "viewPlacements",
            Capability::ManagePlacements => "managePlacements",
            Capability::ViewReports => "viewReports",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| format!("unknown capability '{s}'"))
    }
}

/// The capabilities effectively held by one user.
///
/// Built from the permission table when a caller asks for its own profile;
/// ordered so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    inner: BTreeSet<Capability>,
}

impl CapabilitySet {
    /// Grant a capability to this set.
    pub fn grant(&mut self, capability: Capability) {
        self.inner.insert(capability);
    }

    /// Return true if the set contains the given capability.
    pub fn has(&self, capability: Capability) -> bool {
        self.inner.contains(&capability)
    }

    /// Return an iterator over all granted capabilities, in table order.
    pub fn all(&self) -> impl Iterator<Item = Capability> + '_ {
        self.inner.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}
