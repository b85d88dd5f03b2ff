//! JSON Schemas for request bodies.
//!
//! Create schemas list required fields; update schemas accept any non-empty
//! subset. Every schema closes `additionalProperties`, so a body carrying a
//! key the resource does not own (restricted medical fields on a screening,
//! for instance) is rejected with `400` before the store sees it.

use serde_json::{json, Map, Value};

use volunteerflow_contracts::verify::PayloadSchema;

pub(crate) const PIPELINE_STATUSES: [&str; 9] = [
    "interested",
    "applied",
    "screening",
    "medical_screening",
    "selected",
    "placed",
    "onboarded",
    "rejected",
    "withdrawn",
];
pub(crate) const SECTORS: [&str; 6] =
    ["education", "healthcare", "agriculture", "environment", "technology", "community_development"];
pub(crate) const PRIORITIES: [&str; 4] = ["low", "medium", "high", "urgent"];
pub(crate) const MEDICAL_STATUSES: [&str; 5] = ["not_started", "in_progress", "completed", "expired", "failed"];
pub(crate) const PLACEMENT_STATUSES: [&str; 4] = ["placed", "active", "completed", "terminated"];

const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

// ── Property builders ─────────────────────────────────────────────────────────

fn text() -> Value {
    json!({ "type": "string", "minLength": 1 })
}

fn optional_text() -> Value {
    json!({ "type": ["string", "null"] })
}

fn one_of(values: &[&str]) -> Value {
    json!({ "type": "string", "enum": values })
}

fn date() -> Value {
    json!({ "type": "string", "pattern": DATE_PATTERN })
}

fn optional_date() -> Value {
    json!({ "type": ["string", "null"], "pattern": DATE_PATTERN })
}

fn timestamp() -> Value {
    json!({ "type": ["string", "null"], "format": "date-time" })
}

fn string_list() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn flag() -> Value {
    json!({ "type": "boolean" })
}

fn object(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let props: Map<String, Value> = properties.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
    let mut schema = json!({
        "type": "object",
        "properties": props,
        "additionalProperties": false,
    });
    if required.is_empty() {
        schema["minProperties"] = json!(1);
    } else {
        schema["required"] = json!(required);
    }
    schema
}

fn schema(id: &str, json_schema: Value) -> PayloadSchema {
    PayloadSchema { schema_id: id.to_string(), json_schema, rules: Vec::new() }
}

// ── Leads ─────────────────────────────────────────────────────────────────────

fn lead_properties() -> Vec<(&'static str, Value)> {
    vec![
        ("firstName", text()),
        ("lastName", text()),
        ("email", json!({ "type": "string", "pattern": r"^[^@\s]+@[^@\s]+$" })),
        ("phone", optional_text()),
        ("nationality", optional_text()),
        ("currentCountry", optional_text()),
        ("skills", string_list()),
        ("languages", string_list()),
        ("status", one_of(&PIPELINE_STATUSES)),
        ("source", optional_text()),
        ("notes", optional_text()),
    ]
}

pub fn lead_create() -> PayloadSchema {
    schema("lead-create-v1", object(&lead_properties(), &["firstName", "lastName", "email"]))
}

pub fn lead_update() -> PayloadSchema {
    schema("lead-update-v1", object(&lead_properties(), &[]))
}

// ── Positions ─────────────────────────────────────────────────────────────────

fn position_properties() -> Vec<(&'static str, Value)> {
    vec![
        ("title", text()),
        ("description", text()),
        ("sector", one_of(&SECTORS)),
        ("country", text()),
        ("location", optional_text()),
        ("startDate", date()),
        ("endDate", optional_date()),
        ("requirements", string_list()),
        ("isOpen", flag()),
        ("maxVolunteers", json!({ "type": "integer", "minimum": 1 })),
        ("priority", one_of(&PRIORITIES)),
    ]
}

pub fn position_create() -> PayloadSchema {
    schema(
        "position-create-v1",
        object(&position_properties(), &["title", "description", "sector", "country", "startDate"]),
    )
}

pub fn position_update() -> PayloadSchema {
    let mut properties = position_properties();
    // A stored position always has an end date.
    properties.retain(|(k, _)| *k != "endDate");
    properties.push(("endDate", date()));
    properties.push(("currentVolunteers", json!({ "type": "integer", "minimum": 0 })));
    schema("position-update-v1", object(&properties, &[]))
}

// ── Applications ──────────────────────────────────────────────────────────────

pub fn application_create() -> PayloadSchema {
    let properties = [
        ("leadId", text()),
        ("positionId", text()),
        ("status", one_of(&PIPELINE_STATUSES)),
        ("interviewDate", timestamp()),
        ("notes", optional_text()),
    ];
    schema("application-create-v1", object(&properties, &["leadId", "positionId"]))
}

pub fn application_update() -> PayloadSchema {
    let properties = [
        ("status", one_of(&PIPELINE_STATUSES)),
        ("interviewDate", timestamp()),
        ("interviewNotes", optional_text()),
        ("score", json!({ "type": ["integer", "null"], "minimum": 0, "maximum": 100 })),
        ("rejectionReason", optional_text()),
        ("notes", optional_text()),
    ];
    schema("application-update-v1", object(&properties, &[]))
}

// ── Medical screenings ────────────────────────────────────────────────────────

pub fn screening_create() -> PayloadSchema {
    let properties = [
        ("leadId", text()),
        ("status", one_of(&MEDICAL_STATUSES)),
        ("startedAt", timestamp()),
        ("expiresAt", timestamp()),
        ("outcomeNotes", optional_text()),
    ];
    schema("screening-create-v1", object(&properties, &["leadId"]))
}

pub fn screening_update() -> PayloadSchema {
    let properties = [
        ("status", one_of(&MEDICAL_STATUSES)),
        ("startedAt", timestamp()),
        ("completedAt", timestamp()),
        ("expiresAt", timestamp()),
        ("vaccinationsComplete", flag()),
        ("medicalClearance", flag()),
        ("mentalHealthClearance", flag()),
        ("backgroundCheck", flag()),
        ("outcomeNotes", optional_text()),
    ];
    schema("screening-update-v1", object(&properties, &[]))
}

/// The restricted layer. Only accepted on the medical-details route.
pub fn medical_details() -> PayloadSchema {
    let properties = [
        ("medicalHistory", optional_text()),
        ("currentMedications", optional_text()),
        ("screeningNotes", optional_text()),
        ("clearanceReasoning", optional_text()),
    ];
    schema("medical-details-v1", object(&properties, &[]))
}

// ── Placements ────────────────────────────────────────────────────────────────

pub fn placement_create() -> PayloadSchema {
    let properties = [
        ("leadId", text()),
        ("positionId", text()),
        ("startDate", date()),
        ("endDate", date()),
        ("status", one_of(&PLACEMENT_STATUSES)),
        ("supervisor", optional_text()),
        ("notes", optional_text()),
    ];
    schema("placement-create-v1", object(&properties, &["leadId", "positionId", "startDate", "endDate"]))
}

pub fn placement_update() -> PayloadSchema {
    let properties = [
        ("startDate", date()),
        ("endDate", date()),
        ("actualEndDate", optional_date()),
        ("status", one_of(&PLACEMENT_STATUSES)),
        ("onboardingCompleted", flag()),
        ("supervisor", optional_text()),
        ("notes", optional_text()),
    ];
    schema("placement-update-v1", object(&properties, &[]))
}

// ── Development login ─────────────────────────────────────────────────────────

pub fn dev_login() -> PayloadSchema {
    schema("dev-login-v1", object(&[("userId", text())], &["userId"]))
}
