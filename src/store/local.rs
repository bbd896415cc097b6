use crate::db::local_storage;
use crate::errors::{AppError, AppResult};
use crate::store::{Record, Repository, not_found};
use rusqlite::Connection;
use std::marker::PhantomData;

/// Collection stored as one JSON array under `T::STORAGE_KEY`.
///
/// Every mutation loads the full array, changes it in memory and writes it
/// back; there is no partial update.
pub struct LocalRepository<'c, T> {
    conn: &'c Connection,
    user_id: String,
    _record: PhantomData<T>,
}

impl<'c, T: Record> LocalRepository<'c, T> {
    pub fn new(conn: &'c Connection, user_id: &str) -> Self {
        Self {
            conn,
            user_id: user_id.to_string(),
            _record: PhantomData,
        }
    }

    fn load(&self) -> AppResult<Vec<T>> {
        let Some(raw) = local_storage::get_item(self.conn, &self.user_id, T::STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        // A blob we cannot parse is reported, never silently replaced.
        serde_json::from_str(&raw).map_err(|e| AppError::Storage {
            key: T::STORAGE_KEY.to_string(),
            message: format!("cannot parse stored {} list: {}", T::KIND, e),
        })
    }

    fn save(&self, items: &[T]) -> AppResult<()> {
        let raw = serde_json::to_string(items).map_err(|e| AppError::Storage {
            key: T::STORAGE_KEY.to_string(),
            message: e.to_string(),
        })?;
        local_storage::set_item(self.conn, &self.user_id, T::STORAGE_KEY, &raw)
    }
}

impl<T: Record> Repository<T> for LocalRepository<'_, T> {
    fn list(&self) -> AppResult<Vec<T>> {
        self.load()
    }

    fn insert(&self, item: &T) -> AppResult<()> {
        let mut items = self.load()?;
        items.push(item.clone());
        self.save(&items)
    }

    fn update(&self, item: &T) -> AppResult<()> {
        let mut items = self.load()?;
        let slot = items
            .iter_mut()
            .find(|existing| existing.id() == item.id())
            .ok_or_else(|| not_found::<T>(item.id()))?;
        *slot = item.clone();
        self.save(&items)
    }

    fn delete(&self, id: &str) -> AppResult<T> {
        let mut items = self.load()?;
        let idx = items
            .iter()
            .position(|existing| existing.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        let removed = items.remove(idx);
        self.save(&items)?;
        Ok(removed)
    }
}
