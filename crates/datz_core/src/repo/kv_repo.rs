//! Flat key-value repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the string-keyed persistent namespace the catalog writes into.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - One value per key; `set` overwrites.
//! - Values are opaque text; typing belongs to callers.
//! - Empty keys are rejected before touching storage.
//! - Writes made inside `transaction` commit together or not at all.

use crate::db::DbError;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    EmptyKey,
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyKey => write!(f, "key-value key cannot be empty"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptyKey | Self::MissingRequiredTable(_) => None,
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

/// Repository interface for a flat persistent key-value namespace.
pub trait KeyValueRepository {
    /// Reads the raw value stored under `key`.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or overwrites the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Clears `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> RepoResult<bool>;
    /// Lists keys starting with `prefix`, sorted ascending.
    fn keys_with_prefix(&self, prefix: &str) -> RepoResult<Vec<String>>;

    /// Runs `work` as one atomic batch.
    ///
    /// `Ok` commits every write `work` made; `Err` discards all of them.
    /// Batches do not nest.
    fn transaction<T, E>(&self, work: impl FnOnce(&Self) -> Result<T, E>) -> Result<T, E>
    where
        Self: Sized,
        E: From<RepoError>;
}

/// SQLite-backed key-value repository over `kv_entries`.
pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("kv_entries"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        ensure_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        ensure_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        ensure_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }

    fn keys_with_prefix(&self, prefix: &str) -> RepoResult<Vec<String>> {
        // substr keeps `_` and `%` literal, unlike LIKE.
        let mut stmt = self.conn.prepare(
            "SELECT key
             FROM kv_entries
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC;",
        )?;
        let mut rows = stmt.query([prefix])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }

    fn transaction<T, E>(&self, work: impl FnOnce(&Self) -> Result<T, E>) -> Result<T, E>
    where
        Self: Sized,
        E: From<RepoError>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(RepoError::from)?;
        match work(self) {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=kv_rollback module=repo status=error error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }
}

fn ensure_key(key: &str) -> RepoResult<()> {
    if key.is_empty() {
        return Err(RepoError::EmptyKey);
    }
    Ok(())
}
