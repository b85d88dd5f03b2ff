//! Domain records served by the protected resource handlers.
//!
//! JSON field names are camelCase to match what the web client consumes.
//! Medical screenings are split in two: `MedicalScreening` is the outcome
//! layer any screening viewer may read, `MedicalScreeningDetails` is the
//! restricted layer. The two are separate types so no serializer can merge
//! them by accident.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Recruitment pipeline status shared by leads and applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Interested,
    Applied,
    Screening,
    MedicalScreening,
    Selected,
    Placed,
    Onboarded,
    Rejected,
    Withdrawn,
}

impl PipelineStatus {
    /// Every status in pipeline order, the two exits last.
    pub const ALL: [PipelineStatus; 9] = [
        PipelineStatus::Interested,
        PipelineStatus::Applied,
        PipelineStatus::Screening,
        PipelineStatus::MedicalScreening,
        PipelineStatus::Selected,
        PipelineStatus::Placed,
        PipelineStatus::Onboarded,
        PipelineStatus::Rejected,
        PipelineStatus::Withdrawn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::Interested => "interested",
            PipelineStatus::Applied => "applied",
            PipelineStatus::Screening => "screening",
            PipelineStatus::MedicalScreening => "medical_screening",
            PipelineStatus::Selected => "selected",
            PipelineStatus::Placed => "placed",
            PipelineStatus::Onboarded => "onboarded",
            PipelineStatus::Rejected => "rejected",
            PipelineStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Education,
    Healthcare,
    Agriculture,
    Environment,
    Technology,
    CommunityDevelopment,
}

impl Sector {
    pub const ALL: [Sector; 6] = [
        Sector::Education,
        Sector::Healthcare,
        Sector::Agriculture,
        Sector::Environment,
        Sector::Technology,
        Sector::CommunityDevelopment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sector::Education => "education",
            Sector::Healthcare => "healthcare",
            Sector::Agriculture => "agriculture",
            Sector::Environment => "environment",
            Sector::Technology => "technology",
            Sector::CommunityDevelopment => "community_development",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Expired,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    #[default]
    Placed,
    Active,
    Completed,
    Terminated,
}

// ── Leads ─────────────────────────────────────────────────────────────────────

/// A prospective volunteer at any stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub current_country: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub status: PipelineStatus,
    /// How the lead heard about the programme.
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub current_country: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub status: Option<PipelineStatus>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

// ── Positions ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub title: String,
    pub description: String,
    pub sector: Sector,
    pub country: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub is_open: bool,
    pub max_volunteers: u32,
    pub current_volunteers: u32,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub title: String,
    pub description: String,
    pub sector: Sector,
    pub country: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    /// Defaults to 27 months after `start_date` when omitted.
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub is_open: Option<bool>,
    pub max_volunteers: Option<u32>,
    pub priority: Option<Priority>,
}

// ── Applications ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub lead_id: String,
    pub position_id: String,
    pub status: PipelineStatus,
    pub applied_at: DateTime<Utc>,
    pub interview_date: Option<DateTime<Utc>>,
    pub interview_notes: Option<String>,
    pub score: Option<i32>,
    pub rejection_reason: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub lead_id: String,
    pub position_id: String,
    pub status: Option<PipelineStatus>,
    pub interview_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

// ── Medical screenings ────────────────────────────────────────────────────────

/// The outcome layer of a screening: status, dates, clearance flags and
/// non-medical notes. Readable under `viewMedicalScreenings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalScreening {
    pub id: String,
    pub lead_id: String,
    pub status: MedicalStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub vaccinations_complete: bool,
    pub medical_clearance: bool,
    pub mental_health_clearance: bool,
    pub background_check: bool,
    /// Logistics and outcome notes. Never medical content.
    pub outcome_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicalScreening {
    pub lead_id: String,
    pub status: Option<MedicalStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub outcome_notes: Option<String>,
}

/// The restricted layer of a screening. Readable only under
/// `viewMedicalDetails`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalScreeningDetails {
    pub screening_id: String,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub screening_notes: Option<String>,
    pub clearance_reasoning: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalScreeningDetails {
    /// JSON keys that belong exclusively to the restricted layer.
    pub const RESTRICTED_FIELDS: [&'static str; 4] = [
        "medicalHistory",
        "currentMedications",
        "screeningNotes",
        "clearanceReasoning",
    ];
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalDetailsInput {
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub screening_notes: Option<String>,
    pub clearance_reasoning: Option<String>,
}

// ── Placements ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: String,
    pub lead_id: String,
    pub position_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: PlacementStatus,
    pub onboarding_completed: bool,
    pub supervisor: Option<String>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlacement {
    pub lead_id: String,
    pub position_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<PlacementStatus>,
    pub supervisor: Option<String>,
    pub notes: Option<String>,
}

// ── Activity feed ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    LeadCreated,
    LeadUpdated,
    LeadDeleted,
    PositionCreated,
    PositionUpdated,
    PositionDeleted,
    ApplicationSubmitted,
    ApplicationUpdated,
    ScreeningCreated,
    ScreeningUpdated,
    PlacementCreated,
    PlacementUpdated,
}

/// One entry of the dashboard's recent-activity feed.
///
/// Descriptions name records by title or id only. Medical content never
/// reaches the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub lead_id: Option<String>,
    pub position_id: Option<String>,
    pub application_id: Option<String>,
    /// Staff member who made the change.
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ── Reports ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    pub stage: PipelineStatus,
    pub count: usize,
    /// Share of all leads at this stage, rounded to a whole percent.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorStat {
    pub sector: Sector,
    pub total: u32,
    pub filled: u32,
    pub open: u32,
}

/// Headline counts for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Leads still at `interested`.
    pub active_leads: usize,
    pub open_positions: usize,
    /// Leads at `screening` or `medical_screening`.
    pub in_screening: usize,
    /// Placements currently `active`.
    pub deployed: usize,
    pub pipeline_stages: Vec<PipelineStage>,
    pub sector_stats: Vec<SectorStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgentKind {
    MedicalExpiring,
    PendingInterviews,
}

/// A dashboard alert with the number of records needing attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentItem {
    #[serde(rename = "type")]
    pub kind: UrgentKind,
    pub title: String,
    pub subtitle: String,
    pub count: usize,
}
