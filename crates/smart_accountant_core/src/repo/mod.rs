//! Repository layer over the persistence medium.
//!
//! # Responsibility
//! - Define the slot-level storage contract the record store depends on.
//! - Keep SQL inside this boundary.
//!
//! # Invariants
//! - A single `put` replaces a slot atomically.
//! - Repository errors are transport errors only; payload decoding is the
//!   caller's concern.

pub mod kv_repo;
