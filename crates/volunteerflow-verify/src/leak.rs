//! Outbound restricted-field check.

use serde_json::Value;

use volunteerflow_contracts::{
    records::MedicalScreeningDetails,
    verify::{PayloadSchema, VerificationRule, VerificationRuleType},
};

/// Schema id of the outbound leak check, used in logs and failure reports.
pub const RESTRICTED_FIELDS_SCHEMA_ID: &str = "restricted-fields-v1";

/// One `ForbiddenField` rule per medical-details field.
///
/// Every response except the medical-details route itself is verified
/// against this schema before it is returned.
pub fn restricted_fields_schema() -> PayloadSchema {
    let rules = MedicalScreeningDetails::RESTRICTED_FIELDS
        .iter()
        .map(|field| VerificationRule {
            rule_id: format!("no-{field}"),
            description: format!("response must not carry '{field}'"),
            rule_type: VerificationRuleType::ForbiddenField {
                field_name: (*field).to_string(),
            },
        })
        .collect();

    PayloadSchema {
        schema_id: RESTRICTED_FIELDS_SCHEMA_ID.to_string(),
        json_schema: Value::Null,
        rules,
    }
}
