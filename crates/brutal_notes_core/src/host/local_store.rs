//! Persistent local key/value mirror for the fallback host.
//!
//! # Responsibility
//! - Keep fallback storage writes across process restarts.
//! - Hide SQLite details behind a small get/put/delete surface.
//!
//! # Invariants
//! - `put` is an upsert; a key has at most one row.
//! - `entries` returns rows ordered by key.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Mutex;

pub type LocalStoreResult<T> = Result<T, LocalStoreError>;

#[derive(Debug)]
pub enum LocalStoreError {
    Db(DbError),
    /// A previous holder of the connection lock panicked.
    Poisoned,
}

impl Display for LocalStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "local store lock poisoned"),
        }
    }
}

impl Error for LocalStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Poisoned => None,
        }
    }
}

impl From<DbError> for LocalStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LocalStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQLite-backed key/value table.
pub struct LocalKvStore {
    conn: Mutex<Connection>,
}

impl LocalKvStore {
    /// Opens the mirror at `path`, creating the file when missing.
    pub fn open(path: impl AsRef<Path>) -> LocalStoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a mirror that lives only as long as this value.
    pub fn open_in_memory() -> LocalStoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn get(&self, key: &str) -> LocalStoreResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn put(&self, key: &str, value: &str) -> LocalStoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    /// Removes `key`. Returns whether a row existed.
    pub fn delete(&self, key: &str) -> LocalStoreResult<bool> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM kv_entries WHERE key = ?1;", params![key])?;
        Ok(changed > 0)
    }

    /// Returns every stored `(key, value)` pair.
    pub fn entries(&self) -> LocalStoreResult<Vec<(String, String)>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM kv_entries ORDER BY key ASC;")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    fn lock(&self) -> LocalStoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| LocalStoreError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::LocalKvStore;

    #[test]
    fn put_overwrites_existing_value() {
        let store = LocalKvStore::open_in_memory().expect("in-memory store");
        store.put("k", "one").expect("first put");
        store.put("k", "two").expect("second put");

        assert_eq!(store.get("k").expect("get").as_deref(), Some("two"));
        assert_eq!(store.entries().expect("entries").len(), 1);
    }

    #[test]
    fn delete_reports_whether_key_existed() {
        let store = LocalKvStore::open_in_memory().expect("in-memory store");
        store.put("k", "v").expect("put");

        assert!(store.delete("k").expect("delete existing"));
        assert!(!store.delete("k").expect("delete missing"));
        assert_eq!(store.get("k").expect("get"), None);
    }

    #[test]
    fn entries_are_sorted_by_key() {
        let store = LocalKvStore::open_in_memory().expect("in-memory store");
        store.put("b", "2").expect("put b");
        store.put("a", "1").expect("put a");

        let keys: Vec<String> = store
            .entries()
            .expect("entries")
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
