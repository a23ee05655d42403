//! Bookkeeping domain model.
//!
//! # Responsibility
//! - Define records, drafts and the snapshot they live in.
//! - Own the JSON wire shape of the persisted snapshot.
//!
//! # Invariants
//! - Records are identified by a stable `RecordId`, never by position alone.
//! - Customer names on invoices are plain text; nothing cascades on delete.

pub mod record;
pub mod snapshot;
