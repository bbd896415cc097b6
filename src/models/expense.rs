use crate::models::category::{CatalogCategory, OTHER_CATEGORY, find_catalog};
use crate::store::Record;
use crate::store::sql::{optional_text, read_timestamp, timestamp_value};
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub id: String,
    pub amount: f64,
    pub category_id: u32,
    pub category_name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpenseItem {
    pub fn catalog(&self) -> &'static CatalogCategory {
        find_catalog(self.category_id).unwrap_or(OTHER_CATEGORY)
    }

    /// Case-insensitive match on description or category name.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.description.to_lowercase().contains(&term)
            || self.category_name.to_lowercase().contains(&term)
    }
}

impl Record for ExpenseItem {
    const KIND: &'static str = "Expense";
    const STORAGE_KEY: &'static str = "expenses";
    const TABLE: &'static str = "expenses";
    const COLUMNS: &'static [&'static str] = &[
        "amount",
        "category_id",
        "category_name",
        "description",
        "date",
        "notes",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn sql_values(&self) -> Vec<Value> {
        vec![
            Value::Real(self.amount),
            Value::Integer(i64::from(self.category_id)),
            Value::Text(self.category_name.clone()),
            Value::Text(self.description.clone()),
            timestamp_value(&self.date),
            optional_text(&self.notes),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ExpenseItem {
            id: row.get("id")?,
            amount: row.get("amount")?,
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
            description: row.get("description")?,
            date: read_timestamp(row, "date")?,
            notes: row.get("notes")?,
        })
    }
}
