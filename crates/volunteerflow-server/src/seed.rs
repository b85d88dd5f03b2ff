//! Seed staff accounts and recruitment records.
//!
//! All data in this module is hardcoded and fictional. It stands in for the
//! relational store of a real deployment so that every protected route has
//! something to serve.

use chrono::{DateTime, NaiveDate, Utc};

use volunteerflow_contracts::{
    records::{
        Application, Lead, MedicalScreening, MedicalScreeningDetails, MedicalStatus,
        PipelineStatus, Placement, PlacementStatus, Position, Priority, Sector,
    },
    role::Role,
    user::User,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(9, 0, 0).unwrap_or_default().and_utc()
}

// ── Staff ─────────────────────────────────────────────────────────────────────

fn staff(id: &str, email: &str, first: &str, last: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        email: Some(email.to_string()),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        role: Some(role.as_str().to_string()),
    }
}

/// One staff account per role, `user_1` through `user_4`.
pub fn staff_users() -> Vec<User> {
    vec![
        staff("user_1", "recruiter@volunteerflow.org", "Sarah", "Johnson", Role::Recruiter),
        staff("user_2", "placement@volunteerflow.org", "Michael", "Chen", Role::PlacementOfficer),
        staff("user_3", "medical@volunteerflow.org", "Dr. Emily", "Rodriguez", Role::MedicalScreener),
        staff("user_4", "country@volunteerflow.org", "James", "Okoye", Role::CountryOfficer),
    ]
}

// ── Leads ─────────────────────────────────────────────────────────────────────

fn lead(id: &str, first: &str, last: &str, country: &str, status: PipelineStatus, skills: &[&str]) -> Lead {
    let created = at(2025, 1, 6);
    Lead {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@example.org", first.to_lowercase(), last.to_lowercase()),
        phone: None,
        nationality: None,
        current_country: Some(country.to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        languages: vec!["English".to_string()],
        status,
        source: Some("website".to_string()),
        notes: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn leads() -> Vec<Lead> {
    vec![
        lead("lead-1", "Amara", "Osei", "Ghana", PipelineStatus::Interested, &["teaching"]),
        lead("lead-2", "Lucas", "Moreau", "France", PipelineStatus::Applied, &["nursing", "first aid"]),
        lead("lead-3", "Priya", "Nair", "India", PipelineStatus::MedicalScreening, &["agronomy"]),
        lead("lead-4", "Tomas", "Silva", "Brazil", PipelineStatus::Placed, &["software"]),
        lead("lead-5", "Hana", "Sato", "Japan", PipelineStatus::Screening, &["water engineering"]),
        lead("lead-6", "Kwame", "Mensah", "Ghana", PipelineStatus::Withdrawn, &[]),
    ]
}

// ── Positions ─────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn position(
    id: &str,
    title: &str,
    sector: Sector,
    country: &str,
    start: NaiveDate,
    is_open: bool,
    filled: u32,
    priority: Priority,
) -> Position {
    let created = at(2024, 11, 1);
    Position {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} in {country}"),
        sector,
        country: country.to_string(),
        location: None,
        start_date: start,
        end_date: start.checked_add_months(chrono::Months::new(27)).unwrap_or(start),
        requirements: Vec::new(),
        is_open,
        max_volunteers: 2,
        current_volunteers: filled,
        priority,
        created_at: created,
        updated_at: created,
    }
}

pub fn positions() -> Vec<Position> {
    vec![
        position("pos-1", "Secondary Maths Teacher", Sector::Education, "Ghana", date(2025, 9, 1), true, 0, Priority::High),
        position("pos-2", "Community Health Nurse", Sector::Healthcare, "Malawi", date(2025, 6, 1), true, 1, Priority::Urgent),
        position("pos-3", "Irrigation Advisor", Sector::Agriculture, "Peru", date(2025, 3, 1), false, 2, Priority::Medium),
        position("pos-4", "Web Platform Volunteer", Sector::Technology, "Kenya", date(2025, 1, 15), false, 1, Priority::Low),
        position("pos-5", "Literacy Coordinator", Sector::Education, "Nepal", date(2025, 10, 1), true, 0, Priority::Medium),
    ]
}

// ── Applications ──────────────────────────────────────────────────────────────

fn application(id: &str, lead_id: &str, position_id: &str, status: PipelineStatus) -> Application {
    Application {
        id: id.to_string(),
        lead_id: lead_id.to_string(),
        position_id: position_id.to_string(),
        status,
        applied_at: at(2025, 2, 1),
        interview_date: None,
        interview_notes: None,
        score: None,
        rejection_reason: None,
        notes: None,
        updated_at: at(2025, 2, 1),
    }
}

pub fn applications() -> Vec<Application> {
    vec![
        application("app-1", "lead-2", "pos-2", PipelineStatus::Applied),
        application("app-2", "lead-3", "pos-3", PipelineStatus::MedicalScreening),
        application("app-3", "lead-4", "pos-4", PipelineStatus::Placed),
    ]
}

// ── Medical screenings ────────────────────────────────────────────────────────

/// Outcome layers and the matching restricted layers.
///
/// `ms-1` has restricted details on file, `ms-2` does not.
pub fn medical_screenings() -> (Vec<MedicalScreening>, Vec<MedicalScreeningDetails>) {
    let screenings = vec![
        MedicalScreening {
            id: "ms-1".to_string(),
            lead_id: "lead-3".to_string(),
            status: MedicalStatus::InProgress,
            started_at: Some(at(2025, 3, 3)),
            completed_at: None,
            expires_at: None,
            vaccinations_complete: true,
            medical_clearance: false,
            mental_health_clearance: true,
            background_check: true,
            outcome_notes: Some("Awaiting final clearance appointment".to_string()),
            updated_at: at(2025, 3, 10),
        },
        MedicalScreening {
            id: "ms-2".to_string(),
            lead_id: "lead-4".to_string(),
            status: MedicalStatus::Completed,
            started_at: Some(at(2024, 12, 2)),
            completed_at: Some(at(2024, 12, 20)),
            expires_at: Some(at(2026, 12, 20)),
            vaccinations_complete: true,
            medical_clearance: true,
            mental_health_clearance: true,
            background_check: true,
            outcome_notes: Some("Cleared for placement".to_string()),
            updated_at: at(2024, 12, 20),
        },
    ];

    let details = vec![MedicalScreeningDetails {
        screening_id: "ms-1".to_string(),
        medical_history: Some("Seasonal asthma, well controlled".to_string()),
        current_medications: Some("Salbutamol inhaler as needed".to_string()),
        screening_notes: Some("Spirometry scheduled before clearance".to_string()),
        clearance_reasoning: None,
        updated_at: at(2025, 3, 10),
    }];

    (screenings, details)
}

// ── Placements ────────────────────────────────────────────────────────────────

pub fn placements() -> Vec<Placement> {
    vec![Placement {
        id: "pl-1".to_string(),
        lead_id: "lead-4".to_string(),
        position_id: "pos-4".to_string(),
        start_date: date(2025, 1, 15),
        end_date: date(2027, 4, 15),
        actual_end_date: None,
        status: PlacementStatus::Active,
        onboarding_completed: true,
        supervisor: Some("Grace Wanjiru".to_string()),
        notes: None,
        updated_at: at(2025, 1, 15),
    }]
}
