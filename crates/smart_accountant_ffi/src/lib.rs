//! FFI surface for the native Smart Accountant UI.

pub mod api;
