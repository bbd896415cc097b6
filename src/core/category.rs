use crate::config::Config;
use crate::core::validation::CategoryForm;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::models::category::UserCategory;
use crate::store::{self, Repository};
use rusqlite::Connection;

/// The user's own labels on top of the fixed catalog.
pub struct CategoryLogic<'c> {
    conn: &'c Connection,
    repo: Box<dyn Repository<UserCategory> + 'c>,
}

impl<'c> CategoryLogic<'c> {
    pub fn new(conn: &'c Connection, cfg: &Config, user_id: &str) -> Self {
        Self {
            conn,
            repo: store::open(conn, cfg.storage.categories, user_id),
        }
    }

    pub fn repo(&self) -> &dyn Repository<UserCategory> {
        self.repo.as_ref()
    }

    pub fn add(&self, form: &CategoryForm) -> AppResult<UserCategory> {
        let valid = form.parse()?;
        let item = UserCategory {
            id: uuid::Uuid::new_v4().to_string(),
            category_id: valid.category_id,
            category_name: valid.category_name,
        };

        self.repo.insert(&item)?;
        ttlog(self.conn, "add", &item.id, &format!("category '{}'", item.category_name))?;
        Ok(item)
    }

    pub fn edit(&self, id: &str, form: &CategoryForm) -> AppResult<UserCategory> {
        let valid = form.parse()?;
        let existing = self.repo.get(id)?;
        let item = UserCategory {
            category_id: valid.category_id,
            category_name: valid.category_name,
            ..existing
        };

        self.repo.update(&item)?;
        ttlog(self.conn, "edit", &item.id, &format!("category '{}'", item.category_name))?;
        Ok(item)
    }

    pub fn delete(&self, id: &str) -> AppResult<UserCategory> {
        let removed = self.repo.delete(id)?;
        ttlog(self.conn, "del", &removed.id, &format!("category '{}'", removed.category_name))?;
        Ok(removed)
    }

    pub fn list(&self) -> AppResult<Vec<UserCategory>> {
        self.repo.list()
    }
}
