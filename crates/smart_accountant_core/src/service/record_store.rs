//! Record store: the single owner of the bookkeeping snapshot.
//!
//! # Responsibility
//! - Load the snapshot from the persistence medium once, at open.
//! - Route every mutation through validate -> persist -> commit -> recompute.
//! - Notify subscribed observers with freshly derived views.
//!
//! # Invariants
//! - Memory never holds a snapshot that failed to persist.
//! - Out-of-range or unknown-id removals are no-ops: nothing is persisted
//!   and no observer fires.
//! - Confirmation of destructive calls happens before they reach the store.

use crate::model::record::{
    Collection, Customer, CustomerDraft, Expense, ExpenseDraft, Invoice, InvoiceDraft, Record,
    RecordId, RecordValidationError,
};
use crate::model::snapshot::{rows_lack_ids, Settings, Snapshot};
use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use crate::views::summary::{DerivedViews, ViewOptions, DEFAULT_RECENT_LIMIT};
use chrono::Datelike;
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the whole JSON snapshot.
pub const SNAPSHOT_KEY: &str = "accountingState";

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store error.
#[derive(Debug)]
pub enum StoreError {
    /// Draft input was rejected before any mutation.
    Validation(RecordValidationError),
    /// Persistence medium failed; in-memory state is unchanged.
    Repo(RepoError),
    /// Snapshot could not be serialized.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Tunables for view recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub recent_limit: usize,
    pub chart_year: i32,
}

impl Default for StoreOptions {
    /// Five recent transactions; chart over the current local year.
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            chart_year: chrono::Local::now().year(),
        }
    }
}

impl From<StoreOptions> for ViewOptions {
    fn from(value: StoreOptions) -> Self {
        Self {
            recent_limit: value.recent_limit,
            chart_year: value.chart_year,
        }
    }
}

/// Reads the persisted snapshot.
///
/// Falls back to [`Snapshot::default`] when nothing is stored or the stored
/// payload does not decode. When only the per-collection legacy slots exist,
/// they are assembled into one snapshot. Records stored without an id get
/// one here, and the snapshot is written back so those ids stay stable
/// across loads. Only medium failures are errors.
pub fn load_snapshot(repo: &impl KeyValueRepository) -> StoreResult<Snapshot> {
    if let Some(payload) = repo.get(SNAPSHOT_KEY)? {
        return match Snapshot::from_json_tracking_ids(&payload) {
            Ok((snapshot, assigned)) => {
                info!(
                    "event=snapshot_load module=store status=ok source=unified invoices={} expenses={} customers={}",
                    snapshot.invoices.len(),
                    snapshot.expenses.len(),
                    snapshot.customers.len()
                );
                if assigned {
                    store_assigned_ids(repo, &snapshot, "unified")?;
                }
                Ok(snapshot)
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=store status=fallback source=unified reason=malformed error={err}"
                );
                Ok(Snapshot::default())
            }
        };
    }

    load_legacy_slots(repo)
}

fn load_legacy_slots(repo: &impl KeyValueRepository) -> StoreResult<Snapshot> {
    let mut snapshot = Snapshot::default();
    let mut found = 0usize;
    let mut assigned = false;

    for collection in Collection::ALL {
        let Some(payload) = repo.get(collection.as_str())? else {
            continue;
        };
        found += 1;
        let decoded = match collection {
            Collection::Invoices => decode_slot(&payload, &mut snapshot.invoices),
            Collection::Expenses => decode_slot(&payload, &mut snapshot.expenses),
            Collection::Customers => decode_slot(&payload, &mut snapshot.customers),
        };
        match decoded {
            Ok(slot_assigned) => assigned |= slot_assigned,
            Err(err) => warn!(
                "event=snapshot_load module=store status=fallback source=legacy slot={} reason=malformed error={err}",
                collection.as_str()
            ),
        }
    }

    let source = if found == 0 { "default" } else { "legacy" };
    info!(
        "event=snapshot_load module=store status=ok source={source} invoices={} expenses={} customers={}",
        snapshot.invoices.len(),
        snapshot.expenses.len(),
        snapshot.customers.len()
    );
    if assigned {
        store_assigned_ids(repo, &snapshot, source)?;
    }
    Ok(snapshot)
}

/// Decodes one legacy slot into `target`; returns whether ids were assigned.
fn decode_slot<T: DeserializeOwned>(payload: &str, target: &mut Vec<T>) -> serde_json::Result<bool> {
    let rows: serde_json::Value = serde_json::from_str(payload)?;
    let assigned = rows_lack_ids(&rows);
    *target = serde_json::from_value(rows)?;
    Ok(assigned)
}

fn store_assigned_ids(
    repo: &impl KeyValueRepository,
    snapshot: &Snapshot,
    source: &str,
) -> StoreResult<()> {
    let payload = snapshot.to_json()?;
    if let Err(err) = repo.put(SNAPSHOT_KEY, &payload) {
        warn!("event=snapshot_load module=store status=error source={source} reason=ids_write error={err}");
        return Err(err.into());
    }
    info!("event=snapshot_load module=store status=ids_assigned source={source}");
    Ok(())
}

type ViewObserver = Box<dyn FnMut(&DerivedViews)>;

/// Owned bookkeeping state bound to one persistence medium.
pub struct RecordStore<R: KeyValueRepository> {
    repo: R,
    options: StoreOptions,
    snapshot: Snapshot,
    views: DerivedViews,
    observers: Vec<ViewObserver>,
}

impl<R: KeyValueRepository> RecordStore<R> {
    /// Loads the persisted snapshot (see [`load_snapshot`]) and derives the
    /// initial views.
    pub fn open(repo: R, options: StoreOptions) -> StoreResult<Self> {
        let snapshot = load_snapshot(&repo)?;
        let views = DerivedViews::compute(&snapshot, options.into());
        Ok(Self {
            repo,
            options,
            snapshot,
            views,
            observers: Vec::new(),
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Views derived from the last committed snapshot.
    pub fn views(&self) -> &DerivedViews {
        &self.views
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Registers `observer` to run after every committed mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&DerivedViews) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Appends an already-built record to its collection.
    pub fn append(&mut self, record: Record) -> StoreResult<RecordId> {
        let id = record.id();
        let collection = record.collection();
        let mut next = self.snapshot.clone();
        next.push(record);
        self.commit(next, "append", collection)?;
        Ok(id)
    }

    pub fn add_invoice(&mut self, draft: InvoiceDraft) -> StoreResult<RecordId> {
        let invoice = Invoice::from_draft(draft)?;
        self.append(Record::Invoice(invoice))
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> StoreResult<RecordId> {
        let expense = Expense::from_draft(draft)?;
        self.append(Record::Expense(expense))
    }

    pub fn add_customer(&mut self, draft: CustomerDraft) -> StoreResult<RecordId> {
        let customer = Customer::from_draft(draft)?;
        self.append(Record::Customer(customer))
    }

    /// Removes the record at `index` and returns it.
    ///
    /// Returns `Ok(None)` without touching storage when `index` is out of
    /// range, so repeating a removal at the same index is safe.
    pub fn remove_at(
        &mut self,
        collection: Collection,
        index: usize,
    ) -> StoreResult<Option<Record>> {
        let mut next = self.snapshot.clone();
        let Some(removed) = next.take_at(collection, index) else {
            info!(
                "event=record_remove module=store status=noop collection={} index={index} len={}",
                collection.as_str(),
                self.snapshot.len_of(collection)
            );
            return Ok(None);
        };
        self.commit(next, "remove", collection)?;
        Ok(Some(removed))
    }

    /// Removes the record with stable `id`; `Ok(None)` when it is unknown.
    pub fn remove_by_id(
        &mut self,
        collection: Collection,
        id: RecordId,
    ) -> StoreResult<Option<Record>> {
        match self.snapshot.position_of(collection, id) {
            Some(index) => self.remove_at(collection, index),
            None => {
                info!(
                    "event=record_remove module=store status=noop collection={} reason=unknown_id",
                    collection.as_str()
                );
                Ok(None)
            }
        }
    }

    /// Replaces both settings fields; see [`Settings::from_input`].
    pub fn update_settings(
        &mut self,
        company_name: impl Into<String>,
        currency: impl Into<String>,
    ) -> StoreResult<()> {
        let mut next = self.snapshot.clone();
        next.settings = Settings::from_input(company_name, currency);
        self.persist_logged(&next, "settings_update", None)?;
        self.snapshot = next;
        info!("event=settings_update module=store status=ok");
        self.recompute();
        Ok(())
    }

    /// Deletes every persisted slot and restores the default snapshot.
    pub fn reset(&mut self) -> StoreResult<()> {
        let mut keys = vec![SNAPSHOT_KEY];
        keys.extend(Collection::ALL.iter().map(|c| c.as_str()));
        self.repo.delete(&keys)?;
        self.snapshot = Snapshot::default();
        info!("event=store_reset module=store status=ok");
        self.recompute();
        Ok(())
    }

    fn commit(
        &mut self,
        next: Snapshot,
        action: &'static str,
        collection: Collection,
    ) -> StoreResult<()> {
        self.persist_logged(&next, &format!("record_{action}"), Some(collection))?;
        self.snapshot = next;
        info!(
            "event=record_{action} module=store status=ok collection={} len={}",
            collection.as_str(),
            self.snapshot.len_of(collection)
        );
        self.recompute();
        Ok(())
    }

    /// Persists `snapshot`; a failure is logged under `event` and returned.
    fn persist_logged(
        &self,
        snapshot: &Snapshot,
        event: &str,
        collection: Option<Collection>,
    ) -> StoreResult<()> {
        self.persist(snapshot).map_err(|err| {
            let scope = collection.map_or("all", Collection::as_str);
            warn!("event={event} module=store status=error collection={scope} error={err}");
            err
        })
    }

    fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let payload = snapshot.to_json()?;
        self.repo.put(SNAPSHOT_KEY, &payload)?;
        Ok(())
    }

    fn recompute(&mut self) {
        self.views = DerivedViews::compute(&self.snapshot, self.options.into());
        for observer in &mut self.observers {
            observer(&self.views);
        }
    }
}
