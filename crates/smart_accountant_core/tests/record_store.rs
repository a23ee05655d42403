use smart_accountant_core::db::open_db_in_memory;
use smart_accountant_core::{
    filter_by_text, load_snapshot, Collection, CustomerDraft, ExpenseDraft, InvoiceDraft,
    InvoiceField, InvoiceStatus, Record, RecordStore, Settings, Snapshot,
    SqliteKeyValueRepository, StoreError, StoreOptions, DEFAULT_CURRENCY,
};

fn options() -> StoreOptions {
    StoreOptions {
        recent_limit: 5,
        chart_year: 2025,
    }
}

fn invoice(customer: &str, amount: &str, status: InvoiceStatus) -> InvoiceDraft {
    InvoiceDraft {
        customer: customer.to_string(),
        amount: amount.to_string(),
        date: "2025-03-01".to_string(),
        status,
    }
}

fn expense(title: &str, amount: &str) -> ExpenseDraft {
    ExpenseDraft {
        title: title.to_string(),
        category: "general".to_string(),
        amount: amount.to_string(),
        date: "2025-03-02".to_string(),
    }
}

#[test]
fn appended_records_reload_identically() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();

    store.add_invoice(invoice("Acme", "100", InvoiceStatus::Paid)).unwrap();
    store.add_expense(expense("Paper", "12.5")).unwrap();
    store
        .add_customer(CustomerDraft {
            name: "Acme".to_string(),
            phone: "777000111".to_string(),
            email: String::new(),
        })
        .unwrap();
    store.update_settings("Nour Trading", "USD").unwrap();

    let reloaded = load_snapshot(&repo).unwrap();
    assert_eq!(&reloaded, store.snapshot());
}

#[test]
fn dashboard_views_follow_every_mutation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();

    store.add_invoice(invoice("A", "100", InvoiceStatus::Paid)).unwrap();
    store.add_invoice(invoice("B", "50", InvoiceStatus::Pending)).unwrap();
    store.add_expense(expense("Rent", "40")).unwrap();

    let views = store.views();
    assert_eq!(views.total_revenue, 100.0);
    assert_eq!(views.total_expenses, 40.0);
    assert_eq!(views.net_profit, 60.0);
    assert_eq!(views.counts.total, 2);
    assert_eq!(views.counts.pending, 1);
    assert_eq!(views.recent[0].customer, "B");

    store.remove_at(Collection::Invoices, 0).unwrap();
    assert_eq!(store.views().total_revenue, 0.0);
    assert_eq!(store.views().profit_margin, 0.0);
}

#[test]
fn repeated_remove_at_same_index_is_safe() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();
    store.add_invoice(invoice("A", "1", InvoiceStatus::Paid)).unwrap();
    store.add_invoice(invoice("B", "2", InvoiceStatus::Paid)).unwrap();

    let first = store.remove_at(Collection::Invoices, 1).unwrap();
    let second = store.remove_at(Collection::Invoices, 1).unwrap();

    assert!(matches!(first, Some(Record::Invoice(ref inv)) if inv.customer == "B"));
    assert_eq!(second, None);
    assert_eq!(store.snapshot().invoices.len(), 1);
    assert_eq!(store.snapshot().invoices[0].customer, "A");
    assert_eq!(load_snapshot(&repo).unwrap().invoices.len(), 1);
}

#[test]
fn remove_by_id_targets_the_stable_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();
    store.add_expense(expense("Fuel", "30")).unwrap();
    let target = store.add_expense(expense("Ink", "8")).unwrap();
    store.remove_at(Collection::Expenses, 0).unwrap();

    let removed = store.remove_by_id(Collection::Expenses, target).unwrap();
    assert_eq!(removed.map(|record| record.id()), Some(target));
    assert!(store.snapshot().expenses.is_empty());

    let again = store.remove_by_id(Collection::Expenses, target).unwrap();
    assert_eq!(again, None);
}

#[test]
fn deleting_customer_keeps_invoices_that_name_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();
    store
        .add_customer(CustomerDraft {
            name: "Salem".to_string(),
            ..CustomerDraft::default()
        })
        .unwrap();
    store.add_invoice(invoice("Salem", "90", InvoiceStatus::Paid)).unwrap();

    store.remove_at(Collection::Customers, 0).unwrap();

    assert!(store.snapshot().customers.is_empty());
    assert_eq!(store.snapshot().invoices[0].customer, "Salem");
}

#[test]
fn settings_update_falls_back_to_default_currency() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();

    store.update_settings("", "   ").unwrap();

    let settings = &load_snapshot(&repo).unwrap().settings;
    assert_eq!(settings.company_name, "");
    assert_eq!(settings.currency, DEFAULT_CURRENCY);
}

#[test]
fn reset_then_load_returns_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();
    store.add_invoice(invoice("A", "10", InvoiceStatus::Paid)).unwrap();
    store.update_settings("Other", "EUR").unwrap();

    store.reset().unwrap();

    assert_eq!(store.snapshot(), &Snapshot::default());
    let reloaded = load_snapshot(&repo).unwrap();
    assert_eq!(reloaded, Snapshot::default());
    assert_eq!(reloaded.settings, Settings::default());
    assert_eq!(store.views().total_revenue, 0.0);
}

#[test]
fn non_numeric_amount_is_rejected_at_ingestion() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();
    store.add_expense(expense("Fuel", "30")).unwrap();

    let err = store.add_expense(expense("Snacks", "a lot")).unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.views().total_expenses, 30.0);
    assert!(!store.views().total_expenses.is_nan());
}

#[test]
fn empty_search_returns_all_invoices() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let mut store = RecordStore::open(&repo, options()).unwrap();
    for name in ["Acme", "Globex", "Acme Labs"] {
        store.add_invoice(invoice(name, "5", InvoiceStatus::Pending)).unwrap();
    }

    let invoices = &store.snapshot().invoices;
    assert_eq!(filter_by_text(invoices, InvoiceField::Customer, "").len(), 3);
    assert_eq!(filter_by_text(invoices, InvoiceField::Customer, "Acme").len(), 2);
}
