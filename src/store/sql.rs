use crate::errors::AppResult;
use crate::store::{Record, Repository, not_found};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use std::marker::PhantomData;

/// Collection stored in the relational table `T::TABLE`, one row per record.
pub struct SqlRepository<'c, T> {
    conn: &'c Connection,
    user_id: String,
    _record: PhantomData<T>,
}

impl<'c, T: Record> SqlRepository<'c, T> {
    pub fn new(conn: &'c Connection, user_id: &str) -> Self {
        Self {
            conn,
            user_id: user_id.to_string(),
            _record: PhantomData,
        }
    }

    fn select_sql(filter: &str) -> String {
        format!(
            "SELECT id, user_id, {} FROM {} WHERE user_id = ?1{} ORDER BY rowid ASC",
            T::COLUMNS.join(", "),
            T::TABLE,
            filter
        )
    }

    fn key_values(&self, id: &str) -> Vec<Value> {
        vec![
            Value::Text(id.to_string()),
            Value::Text(self.user_id.clone()),
        ]
    }
}

impl<T: Record> Repository<T> for SqlRepository<'_, T> {
    fn list(&self) -> AppResult<Vec<T>> {
        let mut stmt = self.conn.prepare(&Self::select_sql(""))?;
        let rows = stmt.query_map([&self.user_id], T::from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn get(&self, id: &str) -> AppResult<T> {
        let mut stmt = self.conn.prepare(&Self::select_sql(" AND id = ?2"))?;
        stmt.query_row([self.user_id.as_str(), id], T::from_row)
            .optional()?
            .ok_or_else(|| not_found::<T>(id))
    }

    fn insert(&self, item: &T) -> AppResult<()> {
        let placeholders = (1..=T::COLUMNS.len() + 2)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} (id, user_id, {}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders
        );

        let mut values = self.key_values(item.id());
        values.extend(item.sql_values());

        self.conn.execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    fn update(&self, item: &T) -> AppResult<()> {
        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ?{}", i + 3))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?1 AND user_id = ?2",
            T::TABLE,
            assignments
        );

        let mut values = self.key_values(item.id());
        values.extend(item.sql_values());

        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(not_found::<T>(item.id()));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> AppResult<T> {
        let existing = self.get(id)?;
        self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", T::TABLE),
            params_from_iter(self.key_values(id)),
        )?;
        Ok(existing)
    }
}

/// Timestamp → TEXT column value (RFC 3339, UTC).
pub fn timestamp_value(ts: &DateTime<Utc>) -> Value {
    Value::Text(ts.to_rfc3339())
}

pub fn optional_text(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

/// Read an RFC 3339 TEXT column back into a UTC timestamp.
pub fn read_timestamp(row: &Row<'_>, col: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(col)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}
