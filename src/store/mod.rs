//! Record storage behind one repository interface.
//!
//! Two backends serve the same `Repository<T>` contract:
//! - `local::LocalRepository`: the whole collection as one JSON array in the
//!   `local_storage` table, read and written wholesale under a fixed key.
//! - `sql::SqlRepository`: one relational table per record type.
//!
//! Which backend serves which entity is chosen by `Config::storage`.

pub mod local;
pub mod sql;

use crate::config::Backend;
use crate::errors::{AppError, AppResult};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use local::LocalRepository;
pub use sql::SqlRepository;

/// A flat, user-owned record that both backends know how to persist.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Human-readable kind used in messages ("Income", "Expense", ...).
    const KIND: &'static str;
    /// Local-storage key holding the serialized collection.
    const STORAGE_KEY: &'static str;
    /// Relational table used by the SQL backend.
    const TABLE: &'static str;
    /// Data columns, in the order produced by `sql_values` (without `id` and `user_id`).
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;

    fn sql_values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// CRUD contract shared by every storage backend.
///
/// All operations are scoped to the user the repository was opened for.
pub trait Repository<T: Record> {
    fn list(&self) -> AppResult<Vec<T>>;

    fn insert(&self, item: &T) -> AppResult<()>;

    /// Replace the stored record with the same id. `NotFound` when absent.
    fn update(&self, item: &T) -> AppResult<()>;

    /// Remove the record with this id and return it. `NotFound` when absent.
    fn delete(&self, id: &str) -> AppResult<T>;

    fn get(&self, id: &str) -> AppResult<T> {
        self.list()?
            .into_iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Resolve a full id from a unique prefix typed on the command line.
    fn resolve_id(&self, prefix: &str) -> AppResult<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(not_found::<T>(prefix));
        }

        let items = self.list()?;

        if let Some(exact) = items.iter().find(|item| item.id() == prefix) {
            return Ok(exact.id().to_string());
        }

        let mut matches = items.iter().filter(|item| item.id().starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(only.id().to_string()),
            (Some(_), Some(_)) => Err(AppError::AmbiguousId(prefix.to_string())),
            (None, _) => Err(not_found::<T>(prefix)),
        }
    }
}

pub(crate) fn not_found<T: Record>(id: &str) -> AppError {
    AppError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

/// Open the repository configured for `T`, scoped to `user_id`.
pub fn open<'c, T: Record + 'c>(
    conn: &'c Connection,
    backend: Backend,
    user_id: &str,
) -> Box<dyn Repository<T> + 'c> {
    match backend {
        Backend::Local => Box::new(LocalRepository::<T>::new(conn, user_id)),
        Backend::Database => Box::new(SqlRepository::<T>::new(conn, user_id)),
    }
}
