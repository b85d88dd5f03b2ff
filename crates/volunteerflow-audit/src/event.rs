//! Audit event and log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use volunteerflow_contracts::access::AccessRecord;

/// A single entry in the hash chain.
///
/// Modifying any field, including those of the embedded `record`,
/// invalidates `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    /// The log this event belongs to (one per process by default).
    pub log_id: String,
    pub record: AccessRecord,
    /// Hash of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A snapshot of the trail, produced by `InMemoryAuditWriter::export_log()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub log_id: String,
    /// All events in chain order.
    pub events: Vec<AuditEvent>,
    pub exported_at: DateTime<Utc>,
    /// The `this_hash` of the last event. Empty if the log is empty.
    pub terminal_hash: String,
}
