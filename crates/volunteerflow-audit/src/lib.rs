//! # volunteerflow-audit
//!
//! Append-only, SHA-256 hash-chained trail of every gate decision.
//!
//! Each `AccessRecord` the gate writes is wrapped in an `AuditEvent` that
//! links to the previous event by hash. Tampering with any event breaks the
//! chain and is located by `find_break`.
//!
//! ```rust,ignore
//! use volunteerflow_audit::InMemoryAuditWriter;
//!
//! let writer = Arc::new(InMemoryAuditWriter::new("volunteerflow"));
//! // hand `writer.clone()` to the gate, later:
//! assert!(writer.verify_integrity()?);
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{find_break, hash_event, verify_chain, ChainBreak};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
