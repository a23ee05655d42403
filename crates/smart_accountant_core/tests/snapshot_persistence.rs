use smart_accountant_core::db::{open_db, open_db_in_memory};
use smart_accountant_core::{
    load_snapshot, InvoiceStatus, KeyValueRepository, RecordStore, Snapshot,
    SqliteKeyValueRepository, StoreOptions, DEFAULT_COMPANY_NAME, SNAPSHOT_KEY,
};

#[test]
fn empty_medium_loads_default_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    let snapshot = load_snapshot(&repo).unwrap();

    assert_eq!(snapshot, Snapshot::default());
    assert_eq!(snapshot.settings.company_name, DEFAULT_COMPANY_NAME);
}

#[test]
fn malformed_snapshot_is_replaced_by_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);

    for payload in ["not json", "[1,2,3]", r#"{"invoices":"nope"}"#] {
        repo.put(SNAPSHOT_KEY, payload).unwrap();
        assert_eq!(load_snapshot(&repo).unwrap(), Snapshot::default(), "{payload}");
    }
}

#[test]
fn text_amounts_from_older_snapshots_are_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.put(
        SNAPSHOT_KEY,
        r#"{
            "invoices": [
                {"customer": "Acme", "amount": "1500", "date": "2025-01-09", "status": "paid"}
            ],
            "expenses": [],
            "customers": [],
            "settings": {"companyName": "Nour", "currency": "SAR"}
        }"#,
    )
    .unwrap();

    let snapshot = load_snapshot(&repo).unwrap();

    assert_eq!(snapshot.invoices.len(), 1);
    assert_eq!(snapshot.invoices[0].amount.value(), 1500.0);
    assert_eq!(snapshot.invoices[0].status, InvoiceStatus::Paid);
    assert_eq!(snapshot.settings.currency, "SAR");
}

#[test]
fn legacy_per_collection_slots_are_assembled() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.put(
        "invoices",
        r#"[{"customer":"Acme","amount":"20","date":"2025-02-01","status":"pending"}]"#,
    )
    .unwrap();
    repo.put("customers", "{broken").unwrap();

    let snapshot = load_snapshot(&repo).unwrap();

    assert_eq!(snapshot.invoices.len(), 1);
    assert!(snapshot.customers.is_empty());
    assert!(snapshot.expenses.is_empty());
}

#[test]
fn reset_clears_unified_and_legacy_slots() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.put("expenses", "[]").unwrap();
    let mut store = RecordStore::open(&repo, StoreOptions::default()).unwrap();
    store.update_settings("Nour", "SAR").unwrap();

    store.reset().unwrap();

    assert_eq!(repo.get(SNAPSHOT_KEY).unwrap(), None);
    assert_eq!(repo.get("expenses").unwrap(), None);
}

#[test]
fn snapshot_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.sqlite3");

    let expected = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteKeyValueRepository::new(&conn);
        let mut store = RecordStore::open(&repo, StoreOptions::default()).unwrap();
        store
            .add_invoice(smart_accountant_core::InvoiceDraft {
                customer: "Acme".to_string(),
                amount: "75".to_string(),
                date: "2025-07-04".to_string(),
                status: InvoiceStatus::Paid,
            })
            .unwrap();
        store.snapshot().clone()
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    let store = RecordStore::open(&repo, StoreOptions::default()).unwrap();
    assert_eq!(store.snapshot(), &expected);
    assert_eq!(store.views().total_revenue, 75.0);
}

#[test]
fn records_stored_without_ids_keep_their_ids_and_remove_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::new(&conn);
    repo.put(
        SNAPSHOT_KEY,
        r#"{"invoices":[{"customer":"Acme","amount":"40","date":"2025-04-02","status":"paid"}]}"#,
    )
    .unwrap();

    let listed = RecordStore::open(&repo, StoreOptions::default())
        .unwrap()
        .snapshot()
        .invoices[0]
        .id;

    let mut store = RecordStore::open(&repo, StoreOptions::default()).unwrap();
    let removed = store
        .remove_by_id(smart_accountant_core::Collection::Invoices, listed)
        .unwrap();

    assert_eq!(removed.map(|record| record.id()), Some(listed));
    assert!(load_snapshot(&repo).unwrap().invoices.is_empty());
}
