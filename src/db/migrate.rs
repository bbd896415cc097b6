//! Versioned schema migrations.
//!
//! Each migration runs once; applied versions are recorded in the internal
//! `log` table as `migration_applied` rows, so the log doubles as the
//! migration ledger.

use crate::db::local_storage;
use crate::errors::{AppError, AppResult};
use crate::models::income::source_label;
use crate::ui::messages::{success, warning};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

struct Migration {
    version: &'static str,
    description: &'static str,
    apply: fn(&Connection) -> AppResult<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20251101_0001_core_schema",
        description: "Created users, sessions, verifications, outbox, income, expenses and local_storage tables",
        apply: create_core_schema,
    },
    Migration {
        version: "20251108_0002_savings_and_categories_tables",
        description: "Created savings and categories tables for the database backend",
        apply: create_savings_and_categories,
    },
    Migration {
        version: "20251115_0003_income_name_field",
        description: "Renamed legacy 'name' to 'income_name' in stored income lists",
        apply: rename_income_name_in_blobs,
    },
    Migration {
        version: "20251122_0004_category_ids",
        description: "Assigned ids to stored categories without one",
        apply: backfill_category_ids,
    },
    Migration {
        version: "20251129_0005_income_required_fields",
        description: "Filled id, name, timestamps and owner in stored income lists",
        apply: fill_income_fields,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn create_core_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id                  TEXT PRIMARY KEY,
            name                TEXT NOT NULL,
            email               TEXT NOT NULL UNIQUE,
            email_verified      INTEGER NOT NULL DEFAULT 0,
            password_hash       TEXT NOT NULL,
            password_salt       TEXT NOT NULL,
            password_iterations INTEGER NOT NULL,
            image               TEXT,
            created_at          TEXT NOT NULL,
            updated_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token      TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS verifications (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            email      TEXT NOT NULL,
            purpose    TEXT NOT NULL CHECK(purpose IN ('sign-in','email-verification','forget-password')),
            code       TEXT NOT NULL,
            attempts   INTEGER NOT NULL DEFAULT 0,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS outbox (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            sender    TEXT NOT NULL,
            recipient TEXT NOT NULL,
            subject   TEXT NOT NULL,
            body      TEXT NOT NULL,
            sent_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS income (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            amount      REAL NOT NULL CHECK(amount > 0),
            source      TEXT NOT NULL,
            frequency   TEXT NOT NULL CHECK(frequency IN ('per-week','per-month','per-year')),
            income_name TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS expenses (
            id            TEXT PRIMARY KEY,
            user_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            amount        REAL NOT NULL CHECK(amount > 0),
            category_id   INTEGER NOT NULL,
            category_name TEXT NOT NULL,
            description   TEXT NOT NULL,
            date          TEXT NOT NULL,
            notes         TEXT
        );

        CREATE TABLE IF NOT EXISTS local_storage (
            user_id    TEXT NOT NULL,
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, key)
        );

        CREATE INDEX IF NOT EXISTS idx_income_user ON income(user_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_verifications_email ON verifications(email, purpose);
        "#,
    )?;
    Ok(())
}

fn create_savings_and_categories(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS savings (
            id             TEXT PRIMARY KEY,
            user_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name           TEXT NOT NULL,
            type           TEXT NOT NULL,
            bank_name      TEXT NOT NULL,
            account_number TEXT,
            current_amount REAL NOT NULL CHECK(current_amount >= 0),
            goal_amount    REAL NOT NULL CHECK(goal_amount > 0),
            notes          TEXT,
            date           TEXT NOT NULL,
            last_updated   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
            id            TEXT PRIMARY KEY,
            user_id       TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            category_id   INTEGER NOT NULL,
            category_name TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Rewrite every JSON array stored under `key`, object by object.
///
/// `fix` receives the owning user id and returns true when it changed the
/// object. Blobs that do not parse are left untouched and reported.
fn rewrite_blobs(
    conn: &Connection,
    key: &str,
    fix: impl Fn(&str, &mut serde_json::Map<String, Value>) -> bool,
) -> AppResult<()> {
    for (user_id, raw) in local_storage::all_for_key(conn, key)? {
        let Ok(mut parsed) = serde_json::from_str::<Value>(&raw) else {
            warning(format!(
                "Skipping unreadable '{key}' list for user {user_id}: not valid JSON"
            ));
            continue;
        };

        let Some(items) = parsed.as_array_mut() else {
            continue;
        };

        let mut changed = false;
        for obj in items.iter_mut().filter_map(Value::as_object_mut) {
            changed |= fix(&user_id, obj);
        }

        if changed {
            let rewritten = serde_json::to_string(&parsed).map_err(|e| AppError::Storage {
                key: key.to_string(),
                message: e.to_string(),
            })?;
            local_storage::set_item(conn, &user_id, key, &rewritten)?;
        }
    }
    Ok(())
}

fn rename_income_name_in_blobs(conn: &Connection) -> AppResult<()> {
    rewrite_blobs(conn, "income", |_, obj| {
        if obj.contains_key("income_name") {
            return obj.remove("name").is_some();
        }
        match obj.remove("name") {
            Some(name) => {
                obj.insert("income_name".to_string(), name);
                true
            }
            None => false,
        }
    })
}

fn backfill_category_ids(conn: &Connection) -> AppResult<()> {
    rewrite_blobs(conn, "selectedCategory", |_, obj| {
        if obj.contains_key("id") {
            return false;
        }
        obj.insert(
            "id".to_string(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
        true
    })
}

/// Quick-add lists held only `amount`, `source` and `frequency`.
fn fill_income_fields(conn: &Connection) -> AppResult<()> {
    let now = Value::String(Utc::now().to_rfc3339());

    rewrite_blobs(conn, "income", |user_id, obj| {
        let mut changed = false;

        if !obj.contains_key("id") {
            obj.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
            changed = true;
        }
        if let Some(name) = obj.remove("name") {
            if !obj.contains_key("income_name") {
                obj.insert("income_name".into(), name);
            }
            changed = true;
        }
        if !obj.contains_key("income_name") {
            let source = obj.get("source").and_then(Value::as_str).unwrap_or("other");
            obj.insert("income_name".into(), Value::String(source_label(source)));
            changed = true;
        }
        for field in ["createdAt", "updatedAt"] {
            if !obj.contains_key(field) {
                obj.insert(field.into(), now.clone());
                changed = true;
            }
        }
        if !obj.contains_key("userId") {
            obj.insert("userId".into(), Value::String(user_id.to_string()));
            changed = true;
        }

        changed
    })
}

/// Versions not yet recorded as applied.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, each in its own transaction.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        (m.apply)(&tx).map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;
        tx.commit()?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied += 1;
    }

    Ok(applied)
}
