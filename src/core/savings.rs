use crate::config::Config;
use crate::core::validation::SavingsForm;
use crate::db::log::ttlog;
use crate::errors::AppResult;
use crate::models::savings::SavingsItem;
use crate::store::{self, Repository};
use chrono::Utc;
use rusqlite::Connection;

pub struct SavingsLogic<'c> {
    conn: &'c Connection,
    repo: Box<dyn Repository<SavingsItem> + 'c>,
}

impl<'c> SavingsLogic<'c> {
    pub fn new(conn: &'c Connection, cfg: &Config, user_id: &str) -> Self {
        Self {
            conn,
            repo: store::open(conn, cfg.storage.savings, user_id),
        }
    }

    pub fn repo(&self) -> &dyn Repository<SavingsItem> {
        self.repo.as_ref()
    }

    pub fn add(&self, form: &SavingsForm) -> AppResult<SavingsItem> {
        let valid = form.parse()?;
        let now = Utc::now();
        let item = SavingsItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: valid.name,
            kind: valid.kind,
            bank_name: valid.bank_name,
            account_number: valid.account_number,
            current_amount: valid.current_amount,
            goal_amount: valid.goal_amount,
            notes: valid.notes,
            date: now,
            last_updated: now,
        };

        self.repo.insert(&item)?;
        ttlog(self.conn, "add", &item.id, &format!("savings '{}'", item.name))?;
        Ok(item)
    }

    /// Replace the editable fields; `date` stays, `last_updated` moves to now.
    pub fn edit(&self, id: &str, form: &SavingsForm) -> AppResult<SavingsItem> {
        let valid = form.parse()?;
        let existing = self.repo.get(id)?;
        let item = SavingsItem {
            name: valid.name,
            kind: valid.kind,
            bank_name: valid.bank_name,
            account_number: valid.account_number,
            current_amount: valid.current_amount,
            goal_amount: valid.goal_amount,
            notes: valid.notes,
            last_updated: Utc::now(),
            ..existing
        };

        self.repo.update(&item)?;
        ttlog(self.conn, "edit", &item.id, &format!("savings '{}'", item.name))?;
        Ok(item)
    }

    pub fn delete(&self, id: &str) -> AppResult<SavingsItem> {
        let removed = self.repo.delete(id)?;
        ttlog(self.conn, "del", &removed.id, &format!("savings '{}'", removed.name))?;
        Ok(removed)
    }

    pub fn list(&self) -> AppResult<Vec<SavingsItem>> {
        self.repo.list()
    }

    pub fn form_for(item: &SavingsItem) -> SavingsForm {
        SavingsForm {
            name: item.name.clone(),
            kind: item.kind.as_str().to_string(),
            bank_name: item.bank_name.clone(),
            account_number: item.account_number.clone(),
            current_amount: item.current_amount.to_string(),
            goal_amount: item.goal_amount.to_string(),
            notes: item.notes.clone(),
        }
    }
}
