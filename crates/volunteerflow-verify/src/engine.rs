//! Schema-based payload verifier.
//!
//! Structural JSON Schema errors and rule failures are all collected into a
//! single `VerificationReport`, so a rejected request body lists every
//! problem at once.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use volunteerflow_contracts::{
    error::FlowResult,
    verify::{PayloadSchema, VerificationFailure, VerificationReport, VerificationRule, VerificationRuleType},
};
use volunteerflow_core::traits::Verifier;

/// A caller-supplied check over the whole payload.
///
/// Returns `Some(message)` when the check fails.
pub type CustomVerifierFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

const JSON_SCHEMA_RULE: &str = "json-schema";

/// JSON Schema validation plus named semantic rules.
pub struct SchemaVerifier {
    custom_rules: HashMap<String, CustomVerifierFn>,
}

impl SchemaVerifier {
    pub fn new() -> Self {
        Self { custom_rules: HashMap::new() }
    }

    /// Register a custom check under `name`. A second registration replaces
    /// the first.
    pub fn register_rule(&mut self, name: impl Into<String>, f: CustomVerifierFn) {
        self.custom_rules.insert(name.into(), f);
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    /// Resolve a dotted path against `value`. Missing segments and JSON
    /// `null` both resolve to `None`.
    fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
        path.split('.').try_fold(value, |current, segment| {
            current.get(segment).filter(|v| !v.is_null())
        })
    }

    /// True if any object nested anywhere in `value` has the key `name`.
    fn contains_key(value: &Value, name: &str) -> bool {
        match value {
            Value::Object(map) => {
                map.contains_key(name) || map.values().any(|v| Self::contains_key(v, name))
            }
            Value::Array(items) => items.iter().any(|v| Self::contains_key(v, name)),
            _ => false,
        }
    }

    fn structural_failures(payload: &Value, schema: &PayloadSchema) -> Vec<VerificationFailure> {
        if schema.json_schema.is_null() {
            return Vec::new();
        }

        match jsonschema::validator_for(&schema.json_schema) {
            Ok(validator) => validator
                .iter_errors(payload)
                .map(|error| {
                    let path = error.instance_path.to_string();
                    let location = if path.is_empty() { "/".to_string() } else { path };
                    VerificationFailure {
                        rule_id: JSON_SCHEMA_RULE.to_string(),
                        message: format!("{location}: {error}"),
                    }
                })
                .collect(),
            // A broken schema document rejects the payload instead of
            // letting it through unchecked.
            Err(e) => vec![VerificationFailure {
                rule_id: JSON_SCHEMA_RULE.to_string(),
                message: format!("invalid JSON Schema document: {e}"),
            }],
        }
    }

    fn evaluate_rule(&self, payload: &Value, rule: &VerificationRule) -> Option<String> {
        match &rule.rule_type {
            VerificationRuleType::RequiredField { field_path } => {
                Self::resolve_path(payload, field_path)
                    .is_none()
                    .then(|| format!("required field '{field_path}' is missing or null"))
            }

            // Absent fields pass; pair with RequiredField to demand presence.
            VerificationRuleType::AllowedValues { field_path, allowed } => {
                match Self::resolve_path(payload, field_path) {
                    Some(actual) if !allowed.contains(actual) => Some(format!(
                        "'{field_path}' = {actual} is outside the permitted values"
                    )),
                    _ => None,
                }
            }

            VerificationRuleType::ForbiddenField { field_name } => {
                Self::contains_key(payload, field_name)
                    .then(|| format!("payload carries forbidden field '{field_name}'"))
            }

            VerificationRuleType::Custom { function_name } => {
                match self.custom_rules.get(function_name.as_str()) {
                    Some(f) => f(payload),
                    None => Some(format!(
                        "custom rule '{function_name}' is not registered; failing closed"
                    )),
                }
            }
        }
    }
}

impl Default for SchemaVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for SchemaVerifier {
    fn verify(&self, payload: &Value, schema: &PayloadSchema) -> FlowResult<VerificationReport> {
        let mut failures = Self::structural_failures(payload, schema);
        for failure in &failures {
            warn!(schema_id = %schema.schema_id, message = %failure.message, "structural validation failure");
        }

        for rule in &schema.rules {
            debug!(rule_id = %rule.rule_id, description = %rule.description, "evaluating verification rule");

            if let Some(message) = self.evaluate_rule(payload, rule) {
                warn!(rule_id = %rule.rule_id, %message, "verification rule failed");
                failures.push(VerificationFailure { rule_id: rule.rule_id.clone(), message });
            }
        }

        let passed = failures.is_empty();
        debug!(
            schema_id = %schema.schema_id,
            passed,
            failure_count = failures.len(),
            "verification complete"
        );

        Ok(VerificationReport { passed, failures })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use volunteerflow_contracts::verify::{PayloadSchema, VerificationRule, VerificationRuleType};
    use volunteerflow_core::traits::Verifier;

    use super::SchemaVerifier;

    fn make_schema(json_schema: Value, rules: Vec<VerificationRule>) -> PayloadSchema {
        PayloadSchema { schema_id: "test-schema-v1".to_string(), json_schema, rules }
    }

    fn rule(id: &str, rule_type: VerificationRuleType) -> VerificationRule {
        VerificationRule { rule_id: id.to_string(), description: format!("rule {id}"), rule_type }
    }

    fn lead_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "firstName": { "type": "string", "minLength": 1 },
                "email": { "type": "string" }
            },
            "required": ["firstName", "email"]
        })
    }

    #[test]
    fn test_schema_pass() {
        let verifier = SchemaVerifier::new();
        let report = verifier
            .verify(&json!({ "firstName": "Ada", "email": "ada@example.org" }), &make_schema(lead_schema(), vec![]))
            .unwrap();

        assert!(report.passed, "expected pass, failures: {:?}", report.failures);
    }

    /// Every structural problem is reported, not just the first.
    #[test]
    fn test_schema_collects_all_failures() {
        let verifier = SchemaVerifier::new();
        let report = verifier
            .verify(&json!({ "firstName": "" }), &make_schema(lead_schema(), vec![]))
            .unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures.len(), 2, "failures: {:?}", report.failures);
        assert!(report.failures.iter().all(|f| f.rule_id == "json-schema"));
    }

    #[test]
    fn test_invalid_schema_document_fails_closed() {
        let verifier = SchemaVerifier::new();
        let report = verifier
            .verify(&json!({}), &make_schema(json!({ "type": 42 }), vec![]))
            .unwrap();

        assert!(!report.passed);
        assert!(report.failures[0].message.contains("invalid JSON Schema"));
    }

    #[test]
    fn test_required_field_path() {
        let verifier = SchemaVerifier::new();
        let schema = make_schema(
            Value::Null,
            vec![rule("req-lead", VerificationRuleType::RequiredField { field_path: "lead.id".into() })],
        );

        assert!(verifier.verify(&json!({ "lead": { "id": "lead-1" } }), &schema).unwrap().passed);

        let report = verifier.verify(&json!({ "lead": { "id": null } }), &schema).unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "req-lead");
        assert!(report.failures[0].message.contains("lead.id"));
    }

    #[test]
    fn test_allowed_values() {
        let verifier = SchemaVerifier::new();
        let schema = make_schema(
            Value::Null,
            vec![rule(
                "allowed-sector",
                VerificationRuleType::AllowedValues {
                    field_path: "sector".into(),
                    allowed: vec![json!("health"), json!("education")],
                },
            )],
        );

        assert!(verifier.verify(&json!({ "sector": "health" }), &schema).unwrap().passed);
        assert!(verifier.verify(&json!({}), &schema).unwrap().passed, "absent field should pass");

        let report = verifier.verify(&json!({ "sector": "mining" }), &schema).unwrap();
        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "allowed-sector");
    }

    #[test]
    fn test_forbidden_field_in_array() {
        let verifier = SchemaVerifier::new();
        let schema = make_schema(
            Value::Null,
            vec![rule("no-notes", VerificationRuleType::ForbiddenField { field_name: "screeningNotes".into() })],
        );

        assert!(verifier.verify(&json!([{ "id": "ms-1" }]), &schema).unwrap().passed);

        let report = verifier
            .verify(&json!([{ "id": "ms-1" }, { "id": "ms-2", "screeningNotes": "..." }]), &schema)
            .unwrap();
        assert!(!report.passed);
        assert!(report.failures[0].message.contains("screeningNotes"));
    }

    /// A string value equal to the field name is not a key and must pass.
    #[test]
    fn test_forbidden_field_ignores_values() {
        let verifier = SchemaVerifier::new();
        let schema = make_schema(
            Value::Null,
            vec![rule("no-history", VerificationRuleType::ForbiddenField { field_name: "medicalHistory".into() })],
        );

        assert!(verifier.verify(&json!({ "label": "medicalHistory" }), &schema).unwrap().passed);
    }

    #[test]
    fn test_custom_rule() {
        let mut verifier = SchemaVerifier::new();
        verifier.register_rule(
            "has-lead",
            Box::new(|payload| {
                payload
                    .get("leadId")
                    .is_none()
                    .then(|| "application must reference a lead".to_string())
            }),
        );
        let schema = make_schema(
            Value::Null,
            vec![rule("custom-lead", VerificationRuleType::Custom { function_name: "has-lead".into() })],
        );

        assert!(verifier.verify(&json!({ "leadId": "lead-1" }), &schema).unwrap().passed);

        let report = verifier.verify(&json!({}), &schema).unwrap();
        assert!(!report.passed);
        assert!(report.failures[0].message.contains("must reference a lead"));
    }

    /// A schema naming an unregistered function fails instead of passing silently.
    #[test]
    fn test_unregistered_custom_rule() {
        let verifier = SchemaVerifier::new();
        let schema = make_schema(
            Value::Null,
            vec![rule("phantom", VerificationRuleType::Custom { function_name: "does-not-exist".into() })],
        );

        let report = verifier.verify(&json!({}), &schema).unwrap();
        assert!(!report.passed);
        assert!(report.failures[0].message.contains("does-not-exist"));
    }
}
