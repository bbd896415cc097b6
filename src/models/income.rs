use crate::models::frequency::Frequency;
use crate::store::Record;
use crate::store::sql::{read_timestamp, timestamp_value};
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::{Type, Value};
use serde::{Deserialize, Serialize};

/// Known income sources with their chart colour.
pub const INCOME_SOURCES: [(&str, &str, &str); 5] = [
    ("salary", "Salary", "#3b82f6"),
    ("freelance", "Freelance", "#a855f7"),
    ("investment", "Investment", "#10b981"),
    ("business", "Business", "#f97316"),
    ("other", "Other", "#6366f1"),
];

/// Colour used for sources outside the known list.
pub const FALLBACK_SOURCE_COLOR: &str = "#6b7280";

pub fn source_color(source: &str) -> &'static str {
    INCOME_SOURCES
        .iter()
        .find(|(key, _, _)| *key == source)
        .map(|(_, _, color)| *color)
        .unwrap_or(FALLBACK_SOURCE_COLOR)
}

pub fn source_label(source: &str) -> String {
    INCOME_SOURCES
        .iter()
        .find(|(key, _, _)| *key == source)
        .map(|(_, label, _)| label.to_string())
        .unwrap_or_else(|| source.to_string())
}

/// A recurring income source owned by one user.
///
/// Field names follow the stored JSON shape (`income_name`, `createdAt`, ...);
/// older blobs used `name` for the income name and still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeItem {
    pub id: String,
    pub amount: f64,
    pub source: String,
    pub frequency: Frequency,
    #[serde(rename = "income_name", alias = "name")]
    pub income_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}

impl IncomeItem {
    pub fn monthly_amount(&self) -> f64 {
        self.frequency.to_monthly(self.amount)
    }
}

impl Record for IncomeItem {
    const KIND: &'static str = "Income";
    const STORAGE_KEY: &'static str = "income";
    const TABLE: &'static str = "income";
    const COLUMNS: &'static [&'static str] = &[
        "amount",
        "source",
        "frequency",
        "income_name",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn sql_values(&self) -> Vec<Value> {
        vec![
            Value::Real(self.amount),
            Value::Text(self.source.clone()),
            Value::Text(self.frequency.as_str().to_string()),
            Value::Text(self.income_name.clone()),
            timestamp_value(&self.created_at),
            timestamp_value(&self.updated_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let freq_str: String = row.get("frequency")?;
        let frequency = Frequency::from_db_str(&freq_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("Invalid frequency: {freq_str}").into(),
            )
        })?;

        Ok(IncomeItem {
            id: row.get("id")?,
            amount: row.get("amount")?,
            source: row.get("source")?,
            frequency,
            income_name: row.get("income_name")?,
            created_at: read_timestamp(row, "created_at")?,
            updated_at: read_timestamp(row, "updated_at")?,
            user_id: row.get("user_id")?,
        })
    }
}
