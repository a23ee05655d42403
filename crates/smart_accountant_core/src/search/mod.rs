//! In-memory text search over record collections.
//!
//! # Invariants
//! - Matching is case-sensitive substring containment.
//! - A blank needle matches every record.

pub mod filter;
