//! # volunteerflow-verify
//!
//! Payload verification for the VolunteerFlow service.
//!
//! [`engine::SchemaVerifier`] implements [`volunteerflow_core::traits::Verifier`]
//! and checks a JSON payload in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic**: `RequiredField`, `AllowedValues`, `ForbiddenField` and
//!    `Custom` rules evaluated against the payload.
//!
//! [`leak::restricted_fields_schema`] builds the schema every outbound
//! response passes through so medical-details fields never leave the
//! service on a route that is not meant to carry them.
//!
//! ```rust,ignore
//! use volunteerflow_verify::engine::SchemaVerifier;
//!
//! let mut verifier = SchemaVerifier::new();
//! verifier.register_rule("future-start", Box::new(|payload| None));
//! ```

pub mod engine;
pub mod leak;

pub use engine::{CustomVerifierFn, SchemaVerifier};
pub use leak::restricted_fields_schema;
