//! Derived views over a snapshot.
//!
//! # Responsibility
//! - Turn raw records into display-ready aggregates (totals, counts,
//!   margin, recent list, revenue chart series).
//!
//! # Invariants
//! - Every function here is pure: same snapshot in, same value out.
//! - Input order is preserved unless a function documents otherwise.

pub mod chart;
pub mod summary;

pub use chart::{monthly_revenue, revenue_series, RevenueSeries, MONTH_LABELS};
pub use summary::{
    customer_names, margin_tone, net_profit, profit_margin, recent_transactions, report_counts,
    total_expenses, total_revenue, DerivedViews, MarginTone, RecentTransaction, ReportCounts,
    TransactionKind, ViewOptions,
};
