//! FFI use-case API for the Flutter UI.
//!
//! # Responsibility
//! - Expose store mutations and derived views as sync, use-case level calls.
//! - Keep error semantics simple: envelopes with `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls are serialized; each load -> mutate -> persist runs to completion
//!   before the next call starts.
//! - Destructive calls require `confirmed = true` from the UI.

use log::warn;
use smart_accountant_core::db::open_db;
use smart_accountant_core::{
    core_version as core_version_inner, filter_by_text_indexed,
    init_logging as init_logging_inner, ping as ping_inner, Collection, CustomerDraft,
    CustomerField, DerivedViews, ExpenseDraft, ExpenseField, InvoiceDraft, InvoiceField,
    InvoiceStatus, MarginTone, RecordId, RecordStore, SqliteKeyValueRepository, StoreOptions,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const ENTRY_DB_FILE_NAME: &str = "smart_accountant.sqlite3";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the call with the same `level + log_dir` succeeds.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Idempotent for the same `level + log_dir`.
/// - Reconfiguration with a different level or directory returns an error.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result of a mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or removed record, when there is one.
    pub record_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Option<RecordId>) -> Self {
        Self {
            ok: true,
            record_id: record_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// One recent transaction card.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentItem {
    pub invoice_id: String,
    pub customer: String,
    pub date: String,
    pub amount: f64,
}

/// Everything the dashboard, reports and chart screens paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub message: String,
    pub company_name: String,
    pub currency: String,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub recent: Vec<RecentItem>,
    pub invoice_count: u32,
    pub paid_count: u32,
    pub pending_count: u32,
    pub profit_margin: f64,
    /// `true` when net profit is negative.
    pub margin_warning: bool,
    pub chart_labels: Vec<String>,
    pub chart_data: Vec<f64>,
    pub customer_names: Vec<String>,
}

impl DashboardResponse {
    fn from_views(views: &DerivedViews) -> Self {
        Self {
            ok: true,
            message: String::new(),
            company_name: views.company_name.clone(),
            currency: views.currency.clone(),
            total_revenue: views.total_revenue,
            total_expenses: views.total_expenses,
            net_profit: views.net_profit,
            recent: views
                .recent
                .iter()
                .map(|item| RecentItem {
                    invoice_id: item.invoice_id.to_string(),
                    customer: item.customer.clone(),
                    date: item.date.clone(),
                    amount: item.amount,
                })
                .collect(),
            invoice_count: saturating_u32(views.counts.total),
            paid_count: saturating_u32(views.counts.paid),
            pending_count: saturating_u32(views.counts.pending),
            profit_margin: views.profit_margin,
            margin_warning: views.margin_tone == MarginTone::Warning,
            chart_labels: views
                .revenue_chart
                .labels
                .iter()
                .map(|label| label.to_string())
                .collect(),
            chart_data: views.revenue_chart.data.clone(),
            customer_names: views.customer_names.clone(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            message,
            company_name: String::new(),
            currency: String::new(),
            total_revenue: 0.0,
            total_expenses: 0.0,
            net_profit: 0.0,
            recent: Vec::new(),
            invoice_count: 0,
            paid_count: 0,
            pending_count: 0,
            profit_margin: 0.0,
            margin_warning: false,
            chart_labels: Vec::new(),
            chart_data: Vec::new(),
            customer_names: Vec::new(),
        }
    }
}

/// One table row; `position` is the record's index in its collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub record_id: String,
    pub position: u32,
    /// Customer for invoices, title for expenses.
    pub label: String,
    /// Status for invoices, category for expenses.
    pub detail: String,
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableResponse {
    pub ok: bool,
    pub message: String,
    pub rows: Vec<TableRow>,
}

impl TableResponse {
    fn from_rows(rows: Result<Vec<TableRow>, String>) -> Self {
        match rows {
            Ok(rows) => Self {
                ok: true,
                message: found_message(rows.len()),
                rows,
            },
            Err(message) => Self {
                ok: false,
                message,
                rows: Vec::new(),
            },
        }
    }
}

/// One customers-grid row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub record_id: String,
    pub position: u32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerTableResponse {
    pub ok: bool,
    pub message: String,
    pub rows: Vec<CustomerRow>,
}

impl CustomerTableResponse {
    fn from_rows(rows: Result<Vec<CustomerRow>, String>) -> Self {
        match rows {
            Ok(rows) => Self {
                ok: true,
                message: found_message(rows.len()),
                rows,
            },
            Err(message) => Self {
                ok: false,
                message,
                rows: Vec::new(),
            },
        }
    }
}

/// Derived views for the dashboard, reports and chart screens.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; `ok = false` carries the load error.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard() -> DashboardResponse {
    match with_store(|store| Ok(DashboardResponse::from_views(store.views()))) {
        Ok(response) => response,
        Err(err) => DashboardResponse::failure(format!("dashboard failed: {err}")),
    }
}

/// Records an invoice from the invoice form. `status` is `paid|pending`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the created invoice ID on success and the validation or
///   storage error otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn add_invoice(customer: String, amount: String, date: String, status: String) -> ActionResponse {
    let status = match status.parse::<InvoiceStatus>() {
        Ok(status) => status,
        Err(err) => return ActionResponse::failure(format!("add_invoice failed: {err}")),
    };
    let draft = InvoiceDraft {
        customer,
        amount,
        date,
        status,
    };
    action("add_invoice", "Invoice recorded.", |store| {
        store.add_invoice(draft).map(Some).map_err(|err| err.to_string())
    })
}

/// Records an expense from the expense form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the created expense ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn add_expense(title: String, category: String, amount: String, date: String) -> ActionResponse {
    let draft = ExpenseDraft {
        title,
        category,
        amount,
        date,
    };
    action("add_expense", "Expense recorded.", |store| {
        store.add_expense(draft).map(Some).map_err(|err| err.to_string())
    })
}

/// Adds a customer; blank phone or email are stored as absent.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the created customer ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn add_customer(name: String, phone: String, email: String) -> ActionResponse {
    let draft = CustomerDraft { name, phone, email };
    action("add_customer", "Customer added.", |store| {
        store.add_customer(draft).map(Some).map_err(|err| err.to_string())
    })
}

/// Removes one record by stable id after the UI confirmed it.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Refuses to run unless `confirmed` is true.
/// - An unknown id changes nothing and returns `ok = false` with a
///   not-found message.
#[flutter_rust_bridge::frb(sync)]
pub fn remove_record(collection: String, record_id: String, confirmed: bool) -> ActionResponse {
    if !confirmed {
        return ActionResponse::failure("remove_record requires confirmation");
    }
    let collection = match collection.parse::<Collection>() {
        Ok(collection) => collection,
        Err(err) => return ActionResponse::failure(format!("remove_record failed: {err}")),
    };
    let id = match record_id.trim().parse::<RecordId>() {
        Ok(id) => id,
        Err(err) => return ActionResponse::failure(format!("remove_record failed: {err}")),
    };
    match with_store(|store| {
        store
            .remove_by_id(collection, id)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(record)) => ActionResponse::success("Record removed.", Some(record.id())),
        Ok(None) => ActionResponse::failure(format!(
            "remove_record: {} record not found; nothing removed",
            collection.as_str()
        )),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error fn=remove_record");
            ActionResponse::failure(format!("remove_record failed: {err}"))
        }
    }
}

/// Saves the settings form; a blank currency restores the default symbol.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn update_settings(company_name: String, currency: String) -> ActionResponse {
    action("update_settings", "Settings saved.", |store| {
        store
            .update_settings(company_name, currency)
            .map(|()| None)
            .map_err(|err| err.to_string())
    })
}

/// Deletes all persisted data after the UI confirmed it.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Refuses to run unless `confirmed` is true.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_all(confirmed: bool) -> ActionResponse {
    if !confirmed {
        return ActionResponse::failure("reset_all requires confirmation");
    }
    action("reset_all", "All data cleared.", |store| {
        store.reset().map(|()| None).map_err(|err| err.to_string())
    })
}

/// Invoices whose customer contains `text` (case-sensitive).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Empty `text` returns every invoice in entry order.
#[flutter_rust_bridge::frb(sync)]
pub fn search_invoices(text: String) -> TableResponse {
    TableResponse::from_rows(search_rows("search_invoices", |store| {
        filter_by_text_indexed(&store.snapshot().invoices, InvoiceField::Customer, &text)
            .into_iter()
            .map(|(position, invoice)| TableRow {
                record_id: invoice.id.to_string(),
                position: saturating_u32(position),
                label: invoice.customer.clone(),
                detail: invoice.status.as_str().to_string(),
                date: invoice.date.clone(),
                amount: invoice.amount.value(),
            })
            .collect()
    }))
}

/// Expenses whose title contains `text` (case-sensitive).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Empty `text` returns every expense in entry order.
#[flutter_rust_bridge::frb(sync)]
pub fn search_expenses(text: String) -> TableResponse {
    TableResponse::from_rows(search_rows("search_expenses", |store| {
        filter_by_text_indexed(&store.snapshot().expenses, ExpenseField::Title, &text)
            .into_iter()
            .map(|(position, expense)| TableRow {
                record_id: expense.id.to_string(),
                position: saturating_u32(position),
                label: expense.title.clone(),
                detail: expense.category.clone(),
                date: expense.date.clone(),
                amount: expense.amount.value(),
            })
            .collect()
    }))
}

/// Customers whose name contains `text` (case-sensitive), with contacts.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Empty `text` returns every customer in entry order.
#[flutter_rust_bridge::frb(sync)]
pub fn search_customers(text: String) -> CustomerTableResponse {
    CustomerTableResponse::from_rows(search_rows("search_customers", |store| {
        filter_by_text_indexed(&store.snapshot().customers, CustomerField::Name, &text)
            .into_iter()
            .map(|(position, customer)| CustomerRow {
                record_id: customer.id.to_string(),
                position: saturating_u32(position),
                name: customer.name.clone(),
                phone: customer.phone.clone(),
                email: customer.email.clone(),
            })
            .collect()
    }))
}

type EntryStore<'conn> = RecordStore<SqliteKeyValueRepository<'conn>>;

fn action(
    name: &'static str,
    success: &'static str,
    f: impl FnOnce(&mut EntryStore<'_>) -> Result<Option<RecordId>, String>,
) -> ActionResponse {
    match with_store(f) {
        Ok(record_id) => ActionResponse::success(success, record_id),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error fn={name}");
            ActionResponse::failure(format!("{name} failed: {err}"))
        }
    }
}

fn search_rows<T>(
    name: &'static str,
    f: impl FnOnce(&EntryStore<'_>) -> Vec<T>,
) -> Result<Vec<T>, String> {
    with_store(|store| Ok(f(store))).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error fn={name}");
        format!("{name} failed: {err}")
    })
}

fn found_message(count: usize) -> String {
    format!("Found {count} row(s).")
}

fn with_store<T>(f: impl FnOnce(&mut EntryStore<'_>) -> Result<T, String>) -> Result<T, String> {
    // A panic in another call must not lock the UI out of its data.
    let _guard = STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let db_path = resolve_entry_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("entry DB open failed: {err}"))?;
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(repo, StoreOptions::default())
        .map_err(|err| format!("store load failed: {err}"))?;
    f(&mut store)
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("SMART_ACCOUNTANT_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
        })
        .clone()
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
