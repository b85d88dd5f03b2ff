//! Pipeline, sector and dashboard aggregation.

use chrono::{DateTime, Duration, Utc};

use volunteerflow_contracts::records::{
    Application, DashboardMetrics, Lead, MedicalScreening, MedicalStatus, PipelineStage, PipelineStatus, Placement,
    PlacementStatus, Position, Sector, SectorStat, UrgentItem, UrgentKind,
};

/// How far ahead a completed screening's expiry raises an alert.
pub const MEDICAL_EXPIRY_WINDOW_DAYS: i64 = 30;

/// Lead counts for every status, in pipeline order with rejected and
/// withdrawn last.
///
/// Every status gets a row, zero counts included. Percentages are of all
/// leads, rounded to the nearest whole percent, so the rows sum to about
/// 100. With no leads every row reports 0%.
pub fn pipeline(leads: &[Lead]) -> Vec<PipelineStage> {
    let total = leads.len();
    PipelineStatus::ALL
        .iter()
        .map(|&stage| {
            let count = leads.iter().filter(|l| l.status == stage).count();
            let percentage = if total == 0 {
                0
            } else {
                ((count as f64 / total as f64) * 100.0).round() as u32
            };
            PipelineStage { stage, count, percentage }
        })
        .collect()
}

/// Position totals per sector. Sectors without positions are omitted.
pub fn sectors(positions: &[Position]) -> Vec<SectorStat> {
    Sector::ALL
        .iter()
        .filter_map(|&sector| {
            let in_sector: Vec<&Position> = positions.iter().filter(|p| p.sector == sector).collect();
            if in_sector.is_empty() {
                return None;
            }
            let open = in_sector.iter().filter(|p| p.is_open).count() as u32;
            let total = in_sector.len() as u32;
            Some(SectorStat { sector, total, filled: total - open, open })
        })
        .collect()
}

/// Headline counts plus the pipeline and sector breakdowns.
pub fn metrics(leads: &[Lead], positions: &[Position], placements: &[Placement]) -> DashboardMetrics {
    let leads_at = |statuses: &[PipelineStatus]| leads.iter().filter(|l| statuses.contains(&l.status)).count();
    DashboardMetrics {
        active_leads: leads_at(&[PipelineStatus::Interested]),
        open_positions: positions.iter().filter(|p| p.is_open).count(),
        in_screening: leads_at(&[PipelineStatus::Screening, PipelineStatus::MedicalScreening]),
        deployed: placements.iter().filter(|p| p.status == PlacementStatus::Active).count(),
        pipeline_stages: pipeline(leads),
        sector_stats: sectors(positions),
    }
}

/// Alerts as of `now`. Alerts with nothing to report are omitted.
///
/// A completed screening counts as expiring once its expiry is at most
/// `MEDICAL_EXPIRY_WINDOW_DAYS` after `now`, already-lapsed ones included.
/// An application is awaiting scheduling while it is `applied` with no
/// interview date.
pub fn urgent_items(
    screenings: &[MedicalScreening],
    applications: &[Application],
    now: DateTime<Utc>,
) -> Vec<UrgentItem> {
    let horizon = now + Duration::days(MEDICAL_EXPIRY_WINDOW_DAYS);
    let expiring = screenings
        .iter()
        .filter(|s| s.status == MedicalStatus::Completed && s.expires_at.is_some_and(|at| at <= horizon))
        .count();
    let unscheduled = applications
        .iter()
        .filter(|a| a.status == PipelineStatus::Applied && a.interview_date.is_none())
        .count();

    let mut items = Vec::new();
    if expiring > 0 {
        items.push(UrgentItem {
            kind: UrgentKind::MedicalExpiring,
            title: "Medical clearance expiring".to_string(),
            subtitle: format!("{expiring} volunteers - expires in {MEDICAL_EXPIRY_WINDOW_DAYS} days"),
            count: expiring,
        });
    }
    if unscheduled > 0 {
        items.push(UrgentItem {
            kind: UrgentKind::PendingInterviews,
            title: "Pending interviews".to_string(),
            subtitle: format!("{unscheduled} candidates awaiting scheduling"),
            count: unscheduled,
        });
    }
    items
}
