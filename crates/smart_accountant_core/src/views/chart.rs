//! Month-bucketed revenue for the dashboard line chart.

use crate::model::snapshot::Snapshot;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Month labels shown on the chart's x axis, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Label and value sequences handed to a chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSeries {
    pub year: i32,
    pub labels: Vec<&'static str>,
    pub data: Vec<f64>,
}

/// Paid revenue per calendar month of `year`, January at index 0.
///
/// Invoices whose date is not `YYYY-MM-DD` are left out of every bucket.
pub fn monthly_revenue(snapshot: &Snapshot, year: i32) -> [f64; 12] {
    let mut buckets = [0.0; 12];
    for invoice in snapshot.invoices.iter().filter(|invoice| invoice.is_paid()) {
        let Ok(date) = NaiveDate::parse_from_str(invoice.date.trim(), DATE_FORMAT) else {
            continue;
        };
        if date.year() == year {
            buckets[date.month0() as usize] += invoice.amount.value();
        }
    }
    buckets
}

pub fn revenue_series(snapshot: &Snapshot, year: i32) -> RevenueSeries {
    RevenueSeries {
        year,
        labels: MONTH_LABELS.to_vec(),
        data: monthly_revenue(snapshot, year).to_vec(),
    }
}
