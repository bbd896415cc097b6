use crate::config::Config;
use crate::core::validation::{ExpenseForm, ValidExpense};
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::models::category::{UserCategory, find_catalog};
use crate::models::expense::ExpenseItem;
use crate::store::{self, Repository};
use chrono::Utc;
use rusqlite::Connection;

/// Optional narrowing of the expense list.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive match on description or category name.
    pub search: Option<String>,
    pub category_id: Option<u32>,
}

impl ExpenseFilter {
    pub fn matches(&self, item: &ExpenseItem) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none_or(|term| item.matches_search(term));
        let category_ok = self.category_id.is_none_or(|id| item.category_id == id);
        search_ok && category_ok
    }

    pub fn is_active(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty()) || self.category_id.is_some()
    }
}

pub struct ExpenseLogic<'c> {
    conn: &'c Connection,
    repo: Box<dyn Repository<ExpenseItem> + 'c>,
    categories: Box<dyn Repository<UserCategory> + 'c>,
}

impl<'c> ExpenseLogic<'c> {
    pub fn new(conn: &'c Connection, cfg: &Config, user_id: &str) -> Self {
        Self {
            conn,
            repo: store::open(conn, cfg.storage.expenses, user_id),
            categories: store::open(conn, cfg.storage.categories, user_id),
        }
    }

    pub fn repo(&self) -> &dyn Repository<ExpenseItem> {
        self.repo.as_ref()
    }

    /// Display name for a catalog id: the user's own label when one exists.
    fn category_name(&self, category_id: u32) -> AppResult<String> {
        let own = self
            .categories
            .list()?
            .into_iter()
            .find(|c| c.category_id == category_id)
            .map(|c| c.category_name);

        Ok(own.unwrap_or_else(|| {
            find_catalog(category_id)
                .map(|c| c.name.to_string())
                .unwrap_or_default()
        }))
    }

    fn build(&self, id: String, valid: ValidExpense) -> AppResult<ExpenseItem> {
        Ok(ExpenseItem {
            id,
            amount: valid.amount,
            category_name: self.category_name(valid.category_id)?,
            category_id: valid.category_id,
            description: valid.description,
            date: Utc::now(),
            notes: valid.notes,
        })
    }

    pub fn add(&self, form: &ExpenseForm) -> AppResult<ExpenseItem> {
        let valid = form.parse()?;
        let item = self.build(uuid::Uuid::new_v4().to_string(), valid)?;

        self.repo.insert(&item)?;
        ttlog(
            self.conn,
            "add",
            &item.id,
            &format!("expense '{}' {:.2}", item.description, item.amount),
        )?;
        Ok(item)
    }

    /// Re-submit the full record; the date moves to now.
    pub fn edit(&self, id: &str, form: &ExpenseForm) -> AppResult<ExpenseItem> {
        let valid = form.parse()?;
        let existing = self.repo.get(id)?;
        let item = self.build(existing.id, valid)?;

        self.repo.update(&item)?;
        ttlog(self.conn, "edit", &item.id, &format!("expense '{}'", item.description))?;
        Ok(item)
    }

    pub fn delete(&self, id: &str) -> AppResult<ExpenseItem> {
        let removed = self.repo.delete(id)?;
        ttlog(self.conn, "del", &removed.id, &format!("expense '{}'", removed.description))?;
        Ok(removed)
    }

    pub fn list(&self, filter: &ExpenseFilter) -> AppResult<Vec<ExpenseItem>> {
        Ok(self
            .repo
            .list()?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect())
    }

    /// Raw form for an existing expense, for edits that change only some fields.
    pub fn form_for(item: &ExpenseItem) -> ExpenseForm {
        ExpenseForm {
            amount: item.amount.to_string(),
            category_id: item.category_id.to_string(),
            description: item.description.clone(),
            notes: item.notes.clone(),
        }
    }
}
