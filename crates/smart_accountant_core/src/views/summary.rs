//! Dashboard and report aggregates.

use crate::model::record::{InvoiceStatus, RecordId};
use crate::model::snapshot::Snapshot;
use crate::views::chart::{revenue_series, RevenueSeries};
use serde::Serialize;

/// Number of invoices shown in the recent transactions list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Sum of amounts over paid invoices only.
pub fn total_revenue(snapshot: &Snapshot) -> f64 {
    snapshot
        .invoices
        .iter()
        .filter(|invoice| invoice.is_paid())
        .map(|invoice| invoice.amount.value())
        .sum()
}

/// Sum of amounts over all expenses.
pub fn total_expenses(snapshot: &Snapshot) -> f64 {
    snapshot
        .expenses
        .iter()
        .map(|expense| expense.amount.value())
        .sum()
}

pub fn net_profit(snapshot: &Snapshot) -> f64 {
    total_revenue(snapshot) - total_expenses(snapshot)
}

/// Direction of money for a listed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
}

/// One row of the dashboard's recent transactions list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentTransaction {
    pub kind: TransactionKind,
    pub invoice_id: RecordId,
    pub customer: String,
    pub amount: f64,
    pub date: String,
    pub status: InvoiceStatus,
}

/// Last `limit` invoices, most recent first.
///
/// Pending invoices are listed too; the list mirrors entry order, not payment.
pub fn recent_transactions(snapshot: &Snapshot, limit: usize) -> Vec<RecentTransaction> {
    snapshot
        .invoices
        .iter()
        .rev()
        .take(limit)
        .map(|invoice| RecentTransaction {
            kind: TransactionKind::Income,
            invoice_id: invoice.id,
            customer: invoice.customer.clone(),
            amount: invoice.amount.value(),
            date: invoice.date.clone(),
            status: invoice.status,
        })
        .collect()
}

/// Invoice counts partitioned by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportCounts {
    pub total: usize,
    pub paid: usize,
    pub pending: usize,
}

pub fn report_counts(snapshot: &Snapshot) -> ReportCounts {
    snapshot
        .invoices
        .iter()
        .fold(ReportCounts::default(), |mut counts, invoice| {
            counts.total += 1;
            match invoice.status {
                InvoiceStatus::Paid => counts.paid += 1,
                InvoiceStatus::Pending => counts.pending += 1,
            }
            counts
        })
}

/// Net profit as a percentage of revenue, rounded to one decimal.
///
/// Returns `0.0` when there is no revenue, whatever the expenses.
pub fn profit_margin(snapshot: &Snapshot) -> f64 {
    let revenue = total_revenue(snapshot);
    if revenue == 0.0 {
        return 0.0;
    }
    round_one_decimal(net_profit(snapshot) / revenue * 100.0)
}

/// Presentation hint for the margin figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTone {
    Normal,
    /// Net profit is negative.
    Warning,
}

pub fn margin_tone(snapshot: &Snapshot) -> MarginTone {
    if net_profit(snapshot) < 0.0 {
        MarginTone::Warning
    } else {
        MarginTone::Normal
    }
}

/// Customer names in entry order, for invoice customer pickers.
pub fn customer_names(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .customers
        .iter()
        .map(|customer| customer.name.clone())
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Inputs to [`DerivedViews::compute`] that do not come from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub recent_limit: usize,
    /// Calendar year bucketed by the revenue chart.
    pub chart_year: i32,
}

impl ViewOptions {
    pub fn for_year(chart_year: i32) -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            chart_year,
        }
    }
}

/// Everything the presentation layer paints after a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedViews {
    pub company_name: String,
    pub currency: String,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub recent: Vec<RecentTransaction>,
    pub counts: ReportCounts,
    pub profit_margin: f64,
    pub margin_tone: MarginTone,
    pub revenue_chart: RevenueSeries,
    pub customer_names: Vec<String>,
}

impl DerivedViews {
    pub fn compute(snapshot: &Snapshot, options: ViewOptions) -> Self {
        let revenue = total_revenue(snapshot);
        let expenses = total_expenses(snapshot);
        Self {
            company_name: snapshot.settings.company_name.clone(),
            currency: snapshot.settings.currency.clone(),
            total_revenue: revenue,
            total_expenses: expenses,
            net_profit: revenue - expenses,
            recent: recent_transactions(snapshot, options.recent_limit),
            counts: report_counts(snapshot),
            profit_margin: profit_margin(snapshot),
            margin_tone: margin_tone(snapshot),
            revenue_chart: revenue_series(snapshot, options.chart_year),
            customer_names: customer_names(snapshot),
        }
    }
}
