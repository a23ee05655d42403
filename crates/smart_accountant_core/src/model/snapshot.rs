//! Whole-system snapshot, the unit of persistence.
//!
//! # Invariants
//! - Missing collections or settings read back as their defaults.
//! - Any other shape mismatch makes the whole payload unreadable; callers
//!   decide whether that means "start from defaults".

use crate::model::record::{Collection, Customer, Expense, Invoice, Record, RecordId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPANY_NAME: &str = "المحاسب الذكي";
pub const DEFAULT_CURRENCY: &str = "ر.ي";

/// Singleton company settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub company_name: String,
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Settings {
    /// Builds settings from form input.
    ///
    /// A blank `currency` falls back to [`DEFAULT_CURRENCY`]; `company_name`
    /// is kept verbatim, including when empty.
    pub fn from_input(company_name: impl Into<String>, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        let currency = match currency.trim() {
            "" => DEFAULT_CURRENCY.to_string(),
            symbol => symbol.to_string(),
        };
        Self {
            company_name: company_name.into(),
            currency,
        }
    }
}

/// Every record collection plus settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub invoices: Vec<Invoice>,
    pub expenses: Vec<Expense>,
    pub customers: Vec<Customer>,
    pub settings: Settings,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }

    /// Like [`Snapshot::from_json`], also reporting whether any record was
    /// stored without an id and received a fresh one while decoding.
    pub fn from_json_tracking_ids(payload: &str) -> serde_json::Result<(Self, bool)> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        let assigned = Collection::ALL.iter().any(|collection| {
            value
                .get(collection.as_str())
                .is_some_and(rows_lack_ids)
        });
        Ok((serde_json::from_value(value)?, assigned))
    }

    /// Number of records in `collection`.
    pub fn len_of(&self, collection: Collection) -> usize {
        match collection {
            Collection::Invoices => self.invoices.len(),
            Collection::Expenses => self.expenses.len(),
            Collection::Customers => self.customers.len(),
        }
    }

    pub fn push(&mut self, record: Record) {
        match record {
            Record::Invoice(invoice) => self.invoices.push(invoice),
            Record::Expense(expense) => self.expenses.push(expense),
            Record::Customer(customer) => self.customers.push(customer),
        }
    }

    /// Removes the record at `index`, or returns `None` when out of range.
    pub fn take_at(&mut self, collection: Collection, index: usize) -> Option<Record> {
        if index >= self.len_of(collection) {
            return None;
        }
        let record = match collection {
            Collection::Invoices => Record::Invoice(self.invoices.remove(index)),
            Collection::Expenses => Record::Expense(self.expenses.remove(index)),
            Collection::Customers => Record::Customer(self.customers.remove(index)),
        };
        Some(record)
    }

    /// Current position of the record with `id` in `collection`.
    pub fn position_of(&self, collection: Collection, id: RecordId) -> Option<usize> {
        match collection {
            Collection::Invoices => self.invoices.iter().position(|r| r.id == id),
            Collection::Expenses => self.expenses.iter().position(|r| r.id == id),
            Collection::Customers => self.customers.iter().position(|r| r.id == id),
        }
    }

    pub fn is_empty(&self) -> bool {
        Collection::ALL.iter().all(|c| self.len_of(*c) == 0)
    }
}

/// `true` when `rows` is an array holding at least one object without `id`.
pub fn rows_lack_ids(rows: &serde_json::Value) -> bool {
    rows.as_array()
        .is_some_and(|rows| rows.iter().any(|row| row.get("id").is_none()))
}
