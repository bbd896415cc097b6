use crate::store::Record;
use crate::store::sql::{optional_text, read_timestamp, timestamp_value};
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::{Type, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsType {
    Emergency,
    Vacation,
    House,
    Car,
    Retirement,
    Wedding,
    Education,
    Other,
}

impl SavingsType {
    pub const ALL: [SavingsType; 8] = [
        SavingsType::Emergency,
        SavingsType::Vacation,
        SavingsType::House,
        SavingsType::Car,
        SavingsType::Retirement,
        SavingsType::Wedding,
        SavingsType::Education,
        SavingsType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SavingsType::Emergency => "emergency",
            SavingsType::Vacation => "vacation",
            SavingsType::House => "house",
            SavingsType::Car => "car",
            SavingsType::Retirement => "retirement",
            SavingsType::Wedding => "wedding",
            SavingsType::Education => "education",
            SavingsType::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn from_input(s: &str) -> Option<Self> {
        Self::from_db_str(&s.trim().to_lowercase())
    }

    pub fn label(&self) -> &'static str {
        match self {
            SavingsType::Emergency => "Emergency Fund",
            SavingsType::Vacation => "Vacation",
            SavingsType::House => "House Down Payment",
            SavingsType::Car => "Car Purchase",
            SavingsType::Retirement => "Retirement",
            SavingsType::Wedding => "Wedding",
            SavingsType::Education => "Education",
            SavingsType::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SavingsType::Emergency => "🐷",
            SavingsType::Vacation => "✈️",
            SavingsType::House => "🏠",
            SavingsType::Car => "🚗",
            SavingsType::Retirement => "📈",
            SavingsType::Wedding => "💍",
            SavingsType::Education => "🎯",
            SavingsType::Other => "👛",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SavingsType::Emergency | SavingsType::Wedding => "#e44e68",
            SavingsType::Vacation | SavingsType::Education => "#1a64db",
            SavingsType::House => "#f59e42",
            SavingsType::Car | SavingsType::Other => "#60b27e",
            SavingsType::Retirement => "#9b59b6",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SavingsType,
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    pub current_amount: f64,
    pub goal_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl SavingsItem {
    /// Progress towards the goal in percent, capped at 100.
    pub fn progress(&self) -> f64 {
        crate::core::aggregate::savings_progress(self.current_amount, self.goal_amount)
    }

    pub fn remaining(&self) -> f64 {
        (self.goal_amount - self.current_amount).max(0.0)
    }
}

impl Record for SavingsItem {
    const KIND: &'static str = "Savings";
    const STORAGE_KEY: &'static str = "savings";
    const TABLE: &'static str = "savings";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "type",
        "bank_name",
        "account_number",
        "current_amount",
        "goal_amount",
        "notes",
        "date",
        "last_updated",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn sql_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.kind.as_str().to_string()),
            Value::Text(self.bank_name.clone()),
            optional_text(&self.account_number),
            Value::Real(self.current_amount),
            Value::Real(self.goal_amount),
            optional_text(&self.notes),
            timestamp_value(&self.date),
            timestamp_value(&self.last_updated),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let type_str: String = row.get("type")?;
        let kind = SavingsType::from_db_str(&type_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("Invalid savings type: {type_str}").into(),
            )
        })?;

        Ok(SavingsItem {
            id: row.get("id")?,
            name: row.get("name")?,
            kind,
            bank_name: row.get("bank_name")?,
            account_number: row.get("account_number")?,
            current_amount: row.get("current_amount")?,
            goal_amount: row.get("goal_amount")?,
            notes: row.get("notes")?,
            date: read_timestamp(row, "date")?,
            last_updated: read_timestamp(row, "last_updated")?,
        })
    }
}
