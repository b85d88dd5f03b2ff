//! Recent-activity feed.
//!
//! Handlers append an entry inside the same store write as the change it
//! describes, so a rejected request leaves nothing in the feed.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use volunteerflow_contracts::records::{
    Activity, ActivityKind, Application, Lead, MedicalScreening, Placement, Position,
};

use crate::store::Record;

/// Entries served by `GET /api/dashboard/recent-activities`.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    Updated,
    Deleted,
}

/// A record whose changes appear in the feed.
pub trait Tracked: Record {
    /// Feed kind for `change`, or `None` when that change is not reported.
    fn kind(change: Change) -> Option<ActivityKind>;

    fn describe(&self, change: Change) -> String;

    /// Fill in the lead, position and application ids this row refers to.
    fn link(&self, activity: &mut Activity);
}

impl Tracked for Lead {
    fn kind(change: Change) -> Option<ActivityKind> {
        Some(match change {
            Change::Created => ActivityKind::LeadCreated,
            Change::Updated => ActivityKind::LeadUpdated,
            Change::Deleted => ActivityKind::LeadDeleted,
        })
    }

    fn describe(&self, change: Change) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        match change {
            Change::Created => format!("New lead {name} added"),
            Change::Updated => format!("Lead {name} updated"),
            Change::Deleted => format!("Lead {name} removed"),
        }
    }

    fn link(&self, activity: &mut Activity) {
        activity.lead_id = Some(self.id.clone());
    }
}

impl Tracked for Position {
    fn kind(change: Change) -> Option<ActivityKind> {
        Some(match change {
            Change::Created => ActivityKind::PositionCreated,
            Change::Updated => ActivityKind::PositionUpdated,
            Change::Deleted => ActivityKind::PositionDeleted,
        })
    }

    fn describe(&self, change: Change) -> String {
        match change {
            Change::Created => format!("New position {} in {}", self.title, self.country),
            Change::Updated => format!("Position {} updated", self.title),
            Change::Deleted => format!("Position {} removed", self.title),
        }
    }

    fn link(&self, activity: &mut Activity) {
        activity.position_id = Some(self.id.clone());
    }
}

impl Tracked for Application {
    fn kind(change: Change) -> Option<ActivityKind> {
        match change {
            Change::Created => Some(ActivityKind::ApplicationSubmitted),
            Change::Updated => Some(ActivityKind::ApplicationUpdated),
            Change::Deleted => None,
        }
    }

    fn describe(&self, change: Change) -> String {
        match change {
            Change::Created => format!("Application submitted by {} for {}", self.lead_id, self.position_id),
            _ => format!("Application {} moved to {}", self.id, self.status.as_str()),
        }
    }

    fn link(&self, activity: &mut Activity) {
        activity.lead_id = Some(self.lead_id.clone());
        activity.position_id = Some(self.position_id.clone());
        activity.application_id = Some(self.id.clone());
    }
}

impl Tracked for MedicalScreening {
    fn kind(change: Change) -> Option<ActivityKind> {
        match change {
            Change::Created => Some(ActivityKind::ScreeningCreated),
            Change::Updated => Some(ActivityKind::ScreeningUpdated),
            Change::Deleted => None,
        }
    }

    fn describe(&self, change: Change) -> String {
        match change {
            Change::Created => format!("Medical screening {} opened for {}", self.id, self.lead_id),
            _ => format!("Medical screening {} updated", self.id),
        }
    }

    fn link(&self, activity: &mut Activity) {
        activity.lead_id = Some(self.lead_id.clone());
    }
}

impl Tracked for Placement {
    fn kind(change: Change) -> Option<ActivityKind> {
        match change {
            Change::Created => Some(ActivityKind::PlacementCreated),
            Change::Updated => Some(ActivityKind::PlacementUpdated),
            Change::Deleted => None,
        }
    }

    fn describe(&self, change: Change) -> String {
        match change {
            Change::Created => format!("{} placed in {}", self.lead_id, self.position_id),
            _ => format!("Placement {} updated", self.id),
        }
    }

    fn link(&self, activity: &mut Activity) {
        activity.lead_id = Some(self.lead_id.clone());
        activity.position_id = Some(self.position_id.clone());
    }
}

/// Append-only log of record changes.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<Activity>,
}

impl ActivityLog {
    /// Append the entry for `change` to `row`, made by `user_id`.
    pub fn record<T: Tracked>(&mut self, row: &T, change: Change, user_id: &str) {
        let Some(kind) = T::kind(change) else {
            return;
        };
        let mut activity = Activity {
            id: format!("act-{}", Uuid::new_v4()),
            kind,
            description: row.describe(change),
            lead_id: None,
            position_id: None,
            application_id: None,
            user_id: Some(user_id.to_string()),
            created_at: Utc::now(),
        };
        row.link(&mut activity);
        debug!(activity_id = %activity.id, kind = ?kind, record_id = %row.id(), "activity recorded");
        self.entries.push(activity);
    }

    pub fn append(&mut self, activity: Activity) {
        self.entries.push(activity);
    }

    /// Up to `limit` entries, newest first. Entries with the same timestamp
    /// come back in reverse order of appending.
    pub fn recent(&self, limit: usize) -> Vec<Activity> {
        let mut entries: Vec<&Activity> = self.entries.iter().rev().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.into_iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use volunteerflow_contracts::records::{Activity, ActivityKind};

    use super::{ActivityLog, Change, RECENT_LIMIT};
    use crate::seed;

    fn entry(n: i64) -> Activity {
        Activity {
            id: format!("act-{n}"),
            kind: ActivityKind::LeadUpdated,
            description: format!("entry {n}"),
            lead_id: None,
            position_id: None,
            application_id: None,
            user_id: None,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(n),
        }
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let mut log = ActivityLog::default();
        // Appended out of order on purpose.
        for n in [3, 0, 11, 7, 1, 2, 4, 5, 6, 8, 9, 10] {
            log.append(entry(n));
        }

        let recent = log.recent(RECENT_LIMIT);
        assert_eq!(recent.len(), RECENT_LIMIT);
        assert_eq!(recent[0].id, "act-11");
        assert_eq!(recent[9].id, "act-2");
        assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(log.len(), 12);
    }

    #[test]
    fn test_same_timestamp_latest_append_first() {
        let mut log = ActivityLog::default();
        let mut second = entry(0);
        second.id = "act-later".to_string();
        log.append(entry(0));
        log.append(second);
        assert_eq!(log.recent(1)[0].id, "act-later");
    }

    #[test]
    fn test_record_links_references() {
        let mut log = ActivityLog::default();
        let application = seed::applications().remove(0);
        log.record(&application, Change::Created, "user_1");

        let recorded = &log.recent(1)[0];
        assert_eq!(recorded.kind, ActivityKind::ApplicationSubmitted);
        assert_eq!(recorded.lead_id.as_deref(), Some("lead-2"));
        assert_eq!(recorded.position_id.as_deref(), Some("pos-2"));
        assert_eq!(recorded.application_id.as_deref(), Some("app-1"));
        assert_eq!(recorded.user_id.as_deref(), Some("user_1"));
    }

    #[test]
    fn test_unreported_change_is_skipped() {
        let mut log = ActivityLog::default();
        log.record(&seed::placements().remove(0), Change::Deleted, "user_2");
        assert!(log.is_empty());

        log.record(&seed::leads().remove(0), Change::Deleted, "user_1");
        assert_eq!(log.recent(1)[0].kind, ActivityKind::LeadDeleted);
    }
}
