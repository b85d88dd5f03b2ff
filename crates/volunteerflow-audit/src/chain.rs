//! Chain hashing and integrity checks.
//!
//! Each event hash covers, in order: a fixed domain tag, the log id, the
//! sequence number (big-endian u64), the previous hash and the compact JSON
//! of the access record. The domain tag keeps these digests from colliding
//! with any other SHA-256 use of the same bytes.

use serde::Serialize;
use sha2::{Digest, Sha256};

use volunteerflow_contracts::access::AccessRecord;

use crate::event::AuditEvent;

const DOMAIN_TAG: &[u8] = b"volunteerflow.audit.v1\0";

/// Lowercase hex SHA-256 of one chain link.
///
/// # Panics
///
/// If `record` fails to serialize, which a plain-data `AccessRecord` never
/// does.
pub fn hash_event(log_id: &str, sequence: u64, record: &AccessRecord, prev_hash: &str) -> String {
    let payload = serde_json::to_vec(record).expect("access record serializes");

    let digest = Sha256::new()
        .chain_update(DOMAIN_TAG)
        .chain_update(log_id.as_bytes())
        .chain_update(sequence.to_be_bytes())
        .chain_update(prev_hash.as_bytes())
        .chain_update(&payload)
        .finalize();
    hex::encode(digest)
}

/// Where and how a chain stops verifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainBreak {
    /// The event at `index` is not numbered `index`.
    Sequence { index: usize, found: u64 },
    /// `prev_hash` does not match the preceding event.
    Link { sequence: u64 },
    /// The stored hash does not match the event contents.
    Digest { sequence: u64 },
}

/// The first break in `events`, or `None` for an intact (or empty) chain.
pub fn find_break(events: &[AuditEvent]) -> Option<ChainBreak> {
    let mut prev = AuditEvent::GENESIS_HASH;

    for (index, event) in events.iter().enumerate() {
        if event.sequence != index as u64 {
            return Some(ChainBreak::Sequence { index, found: event.sequence });
        }
        if event.prev_hash != prev {
            return Some(ChainBreak::Link { sequence: event.sequence });
        }
        if event.this_hash != hash_event(&event.log_id, event.sequence, &event.record, &event.prev_hash) {
            return Some(ChainBreak::Digest { sequence: event.sequence });
        }
        prev = event.this_hash.as_str();
    }
    None
}

pub fn verify_chain(events: &[AuditEvent]) -> bool {
    find_break(events).is_none()
}
