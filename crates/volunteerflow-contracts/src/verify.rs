//! Payload verification schema and report types.
//!
//! Request bodies are checked against a `PayloadSchema` before they reach
//! the store, and outbound responses are checked for restricted fields
//! before they reach a caller. Only a passing `VerificationReport` lets the
//! payload through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the verifier checks a payload against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadSchema {
    /// Unique identifier for this schema (e.g. `"lead-create-v1"`).
    pub schema_id: String,
    /// A JSON Schema document used for structural validation. `Null` skips it.
    pub json_schema: Value,
    /// Additional rules evaluated after structural validation.
    pub rules: Vec<VerificationRule>,
}

/// A single verification rule applied to a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRule {
    /// Stable id, echoed in failures.
    pub rule_id: String,
    pub description: String,
    pub rule_type: VerificationRuleType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationRuleType {
    /// `field_path` must resolve to a non-null value.
    RequiredField {
        /// Dotted path, e.g. `"lead.email"`.
        field_path: String,
    },

    /// The field at `field_path`, when present, must equal one of `allowed`.
    AllowedValues {
        field_path: String,
        allowed: Vec<Value>,
    },

    /// No object anywhere in the payload may carry a key named `field_name`.
    ForbiddenField { field_name: String },

    /// Run a predicate registered on the verifier under this name.
    Custom { function_name: String },
}

/// The result of running all rules in a `PayloadSchema` against a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// No rule failed.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// `"[rule] message; [rule] message"` for logs and error bodies.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Which rule produced this failure.
    pub rule_id: String,
    pub message: String,
}
