//! Key-value store contract and implementations.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure for slot reads and writes.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Connection is not bootstrapped with the `kv_store` schema.
    MissingSchema,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingSchema => {
                write!(f, "kv_store table missing; open the database through open_db")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingSchema => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-valued persistent slots.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed slots over the `kv_store` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection after checking the `kv_store` table exists.
    ///
    /// # Errors
    /// - `StoreError::MissingSchema` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'
            );",
            [],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::MissingSchema);
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local slots; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Creates a store with no slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `(key, value)` pairs.
    pub fn with_slots<I, K, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: RefCell::new(
                slots
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn sqlite_set_overwrites_previous_value() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();

        assert_eq!(store.get("medicineLog").unwrap(), None);
        store.set("medicineLog", "{}").unwrap();
        store.set("medicineLog", r#"{"0-2024-01-01":[]}"#).unwrap();

        assert_eq!(
            store.get("medicineLog").unwrap().as_deref(),
            Some(r#"{"0-2024-01-01":[]}"#)
        );
    }

    #[test]
    fn sqlite_store_requires_migrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKeyValueStore::try_new(&conn).err().unwrap();
        assert!(matches!(err, StoreError::MissingSchema));
    }

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryKeyValueStore::with_slots([("a", "1")]);
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("c").unwrap(), None);
    }
}
