//! Key/value area mirroring the browser `localStorage` API, one namespace per user.
//!
//! Values are opaque strings; callers store JSON arrays in them.

use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

pub fn get_item(conn: &Connection, user_id: &str, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM local_storage WHERE user_id = ?1 AND key = ?2",
            params![user_id, key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_item(conn: &Connection, user_id: &str, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO local_storage (user_id, key, value, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![user_id, key, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// All `(user_id, value)` pairs stored under `key`, across users.
pub fn all_for_key(conn: &Connection, key: &str) -> rusqlite::Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT user_id, value FROM local_storage WHERE key = ?1")?;
    let rows = stmt.query_map([key], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
