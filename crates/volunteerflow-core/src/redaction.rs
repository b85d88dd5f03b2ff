//! Field-level redaction of the restricted medical layer.
//!
//! The outcome view of a screening travels under `viewMedicalScreenings`.
//! The restricted sub-record travels only under `viewMedicalDetails`, and only
//! through this policy. Callers are expected to gate before calling, but the
//! policy re-checks on every call and never touches the source when the
//! check fails.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use volunteerflow_contracts::{
    capability::Capability,
    error::{FlowError, FlowResult},
    records::MedicalScreeningDetails,
    user::User,
};

use crate::traits::{Authorizer, MedicalDetailsSource};

/// What a caller may learn about a restricted sub-record.
///
/// Keeps "not allowed to see" distinct from "nothing recorded" so the client
/// can show the right message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "disclosure", content = "details", rename_all = "snake_case")]
pub enum Disclosure<T> {
    /// The caller lacks the capability. No lookup was performed.
    Restricted,
    /// The caller may see details but none are recorded.
    NotRecorded,
    Disclosed(T),
}

pub struct RedactionPolicy {
    authorizer: Arc<dyn Authorizer>,
}

impl RedactionPolicy {
    pub fn new(authorizer: Arc<dyn Authorizer>) -> Self {
        Self { authorizer }
    }

    /// True if `user` may read restricted medical details.
    pub fn may_view_details(&self, user: Option<&User>) -> bool {
        self.authorizer.has_capability(user, Capability::ViewMedicalDetails)
    }

    /// Fetch the restricted sub-record for `screening_id`.
    ///
    /// Returns `Forbidden` (not an empty result) when `user` lacks
    /// `viewMedicalDetails`, and `Ok(None)` when the caller is allowed but
    /// nothing is recorded.
    pub fn fetch_medical_details(
        &self,
        user: Option<&User>,
        screening_id: &str,
        source: &dyn MedicalDetailsSource,
    ) -> FlowResult<Option<MedicalScreeningDetails>> {
        if !self.may_view_details(user) {
            warn!(
                subject = user.map(|u| u.id.as_str()).unwrap_or("anonymous"),
                screening_id,
                "restricted medical details requested without viewMedicalDetails"
            );
            return Err(FlowError::Forbidden {
                requirement: format!("all of [{}]", Capability::ViewMedicalDetails),
            });
        }
        debug!(screening_id, "disclosing restricted medical details");
        source.medical_details(screening_id)
    }

    /// Like `fetch_medical_details`, folded into a `Disclosure` for views that
    /// compose the outcome layer with whatever the caller may see.
    pub fn disclose(
        &self,
        user: Option<&User>,
        screening_id: &str,
        source: &dyn MedicalDetailsSource,
    ) -> FlowResult<Disclosure<MedicalScreeningDetails>> {
        match self.fetch_medical_details(user, screening_id, source) {
            Ok(Some(details)) => Ok(Disclosure::Disclosed(details)),
            Ok(None) => Ok(Disclosure::NotRecorded),
            Err(FlowError::Forbidden { .. }) => Ok(Disclosure::Restricted),
            Err(e) => Err(e),
        }
    }
}
