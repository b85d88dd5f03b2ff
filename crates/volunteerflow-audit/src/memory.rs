//! Process-local audit trail.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, error};

use volunteerflow_contracts::{
    access::{AccessRecord, GateOutcome},
    error::{FlowError, FlowResult},
};
use volunteerflow_core::traits::AuditWriter;

use crate::{
    chain::{find_break, hash_event, ChainBreak},
    event::{AuditEvent, AuditLog},
};

/// Append-only, hash-chained record of every gate decision.
///
/// One writer is shared by every route through an `Arc`; appends are
/// serialized by the inner mutex so sequence numbers never repeat.
pub struct InMemoryAuditWriter {
    log_id: String,
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditWriter {
    pub fn new(log_id: impl Into<String>) -> Self {
        Self { log_id: log_id.into(), events: Mutex::new(Vec::new()) }
    }

    pub fn log_id(&self) -> &str {
        &self.log_id
    }

    /// Every accessor goes through here, so a poisoned lock is always an
    /// `AuditWriteFailed` and never a panic.
    fn events(&self) -> FlowResult<MutexGuard<'_, Vec<AuditEvent>>> {
        self.events.lock().map_err(|_| FlowError::AuditWriteFailed {
            reason: "audit trail lock poisoned".to_string(),
        })
    }

    pub fn export_log(&self) -> FlowResult<AuditLog> {
        let events = self.events()?.clone();
        let terminal_hash = events.last().map(|e| e.this_hash.clone()).unwrap_or_default();
        Ok(AuditLog { log_id: self.log_id.clone(), events, exported_at: Utc::now(), terminal_hash })
    }

    pub fn len(&self) -> FlowResult<usize> {
        Ok(self.events()?.len())
    }

    pub fn is_empty(&self) -> FlowResult<bool> {
        Ok(self.events()?.is_empty())
    }

    /// First point at which the stored chain fails to verify.
    pub fn first_break(&self) -> FlowResult<Option<ChainBreak>> {
        let found = find_break(&self.events()?);
        if let Some(brk) = &found {
            error!(log_id = %self.log_id, ?brk, "audit chain broken");
        }
        Ok(found)
    }

    pub fn verify_integrity(&self) -> FlowResult<bool> {
        Ok(self.first_break()?.is_none())
    }

    /// Decisions that did not admit the caller.
    pub fn rejections(&self) -> FlowResult<Vec<AccessRecord>> {
        Ok(self
            .events()?
            .iter()
            .filter(|e| e.record.outcome != GateOutcome::Admitted)
            .map(|e| e.record.clone())
            .collect())
    }

    pub fn rejection_count(&self) -> FlowResult<usize> {
        Ok(self.events()?.iter().filter(|e| e.record.outcome != GateOutcome::Admitted).count())
    }
}

impl AuditWriter for InMemoryAuditWriter {
    fn write(&self, record: &AccessRecord) -> FlowResult<()> {
        let mut events = self.events()?;

        let sequence = events.len() as u64;
        let prev_hash = events
            .last()
            .map_or_else(|| AuditEvent::GENESIS_HASH.to_string(), |e| e.this_hash.clone());
        let this_hash = hash_event(&self.log_id, sequence, record, &prev_hash);

        debug!(log_id = %self.log_id, sequence, operation = %record.operation, outcome = ?record.outcome, "audit event appended");
        events.push(AuditEvent {
            sequence,
            log_id: self.log_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash,
        });
        Ok(())
    }
}
