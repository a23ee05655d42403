//! Key-value slot repository and its SQLite implementation.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot repository error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Slot key was empty.
    InvalidKey,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey => write!(f, "slot key cannot be empty"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for named text slots.
pub trait KeyValueRepository {
    /// Returns the slot value, or `None` when the slot was never written.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Creates or replaces the slot value.
    fn put(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Deletes every listed slot in one step. Missing slots are ignored.
    fn delete(&self, keys: &[&str]) -> RepoResult<()>;
}

impl<R: KeyValueRepository + ?Sized> KeyValueRepository for &R {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, keys: &[&str]) -> RepoResult<()> {
        (**self).delete(keys)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        ensure_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        ensure_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=slot_put module=repo status=ok key={key} bytes={}",
            value.len()
        );
        Ok(())
    }

    fn delete(&self, keys: &[&str]) -> RepoResult<()> {
        for key in keys {
            ensure_key(key)?;
        }
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0usize;
        for key in keys {
            removed += tx.execute("DELETE FROM kv_slots WHERE key = ?1;", [key])?;
        }
        tx.commit()?;
        debug!("event=slot_delete module=repo status=ok requested={} removed={removed}", keys.len());
        Ok(())
    }
}

fn ensure_key(key: &str) -> RepoResult<()> {
    if key.trim().is_empty() {
        return Err(RepoError::InvalidKey);
    }
    Ok(())
}
