//! Use-case services.
//!
//! # Responsibility
//! - Own application state and route every mutation through persistence.
//! - Keep presentation shells (CLI, FFI) unaware of storage details.

pub mod record_store;
