pub mod auth;
pub mod backup;
pub mod category;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod expense;
pub mod export;
pub mod income;
pub mod init;
pub mod log;
pub mod savings;

use crate::config::Config;
use crate::core::auth::require_user;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use crate::ui::messages::warning;
use serde::Serialize;
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    io::stdout().flush().ok();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

/// Open the database and load the signed-in user, or fail with `Unauthorized`.
pub(crate) fn open_signed_in(cfg: &Config) -> AppResult<(DbPool, User)> {
    let pool = DbPool::new(&cfg.database)?;
    let user = require_user(&pool.conn, cfg)?;
    Ok((pool, user))
}

/// New flag value when given, otherwise the stored one.
pub(crate) fn or_keep(new: &Option<String>, stored: String) -> String {
    new.clone().unwrap_or(stored)
}

/// Optional field on edit: an empty string clears it.
pub(crate) fn or_keep_optional(new: &Option<String>, stored: Option<String>) -> Option<String> {
    match new {
        Some(v) => Some(v.clone()),
        None => stored,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Other(format!("JSON serialization error: {e}")))?;
    println!("{out}");
    Ok(())
}
