//! # volunteerflow-core
//!
//! The trust boundary of VolunteerFlow.
//!
//! This crate provides:
//! - The collaborator traits (`Authorizer`, `IdentityProvider`, `UserDirectory`,
//!   `AuditWriter`, `Verifier`, `MedicalDetailsSource`)
//! - The `Gate` that every protected operation passes through
//! - The `RedactionPolicy` guarding the restricted medical layer
//!
//! ## Usage
//!
//! ```rust,ignore
//! use volunteerflow_core::{Gate, GateRequest};
//!
//! let rows = gate.guard(request, |admitted| store.list_leads(&filter))?;
//! ```

pub mod gate;
pub mod redaction;
pub mod traits;

pub use gate::{Admitted, Gate, GateRequest};
pub use redaction::{Disclosure, RedactionPolicy};
