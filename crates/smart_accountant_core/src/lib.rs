//! Core bookkeeping logic for Smart Accountant.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod views;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    Amount, Collection, Customer, CustomerDraft, Expense, ExpenseDraft, Invoice, InvoiceDraft,
    InvoiceStatus, Record, RecordId, RecordValidationError, GENERAL_CUSTOMER,
};
pub use model::snapshot::{Settings, Snapshot, DEFAULT_COMPANY_NAME, DEFAULT_CURRENCY};
pub use repo::kv_repo::{KeyValueRepository, RepoError, RepoResult, SqliteKeyValueRepository};
pub use search::filter::{
    filter_by_text, filter_by_text_indexed, CustomerField, ExpenseField, InvoiceField,
    TextSearchable,
};
pub use service::record_store::{
    load_snapshot, RecordStore, StoreError, StoreOptions, StoreResult, SNAPSHOT_KEY,
};
pub use views::{DerivedViews, MarginTone, RecentTransaction, ReportCounts, RevenueSeries};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
