use crate::models::expense::ExpenseItem;
use crate::models::income::IncomeItem;
use crate::models::savings::SavingsItem;
use serde::Serialize;

/// Flat rows shared by the CSV and JSON exporters.
#[derive(Serialize, Clone, Debug)]
pub struct IncomeExport {
    pub id: String,
    pub income_name: String,
    pub source: String,
    pub frequency: String,
    pub amount: f64,
    pub monthly_amount: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&IncomeItem> for IncomeExport {
    fn from(i: &IncomeItem) -> Self {
        Self {
            id: i.id.clone(),
            income_name: i.income_name.clone(),
            source: i.source.clone(),
            frequency: i.frequency.as_str().to_string(),
            amount: i.amount,
            monthly_amount: (i.monthly_amount() * 100.0).round() / 100.0,
            created_at: i.created_at.to_rfc3339(),
            updated_at: i.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct ExpenseExport {
    pub id: String,
    pub date: String,
    pub category_id: u32,
    pub category_name: String,
    pub description: String,
    pub amount: f64,
    pub notes: String,
}

impl From<&ExpenseItem> for ExpenseExport {
    fn from(e: &ExpenseItem) -> Self {
        Self {
            id: e.id.clone(),
            date: e.date.to_rfc3339(),
            category_id: e.category_id,
            category_name: e.category_name.clone(),
            description: e.description.clone(),
            amount: e.amount,
            notes: e.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct SavingsExport {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub bank_name: String,
    pub account_number: String,
    pub current_amount: f64,
    pub goal_amount: f64,
    pub progress: f64,
    pub notes: String,
    pub date: String,
    pub last_updated: String,
}

impl From<&SavingsItem> for SavingsExport {
    fn from(s: &SavingsItem) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            kind: s.kind.as_str().to_string(),
            bank_name: s.bank_name.clone(),
            account_number: s.account_number.clone().unwrap_or_default(),
            current_amount: s.current_amount,
            goal_amount: s.goal_amount,
            progress: (s.progress() * 10.0).round() / 10.0,
            notes: s.notes.clone().unwrap_or_default(),
            date: s.date.to_rfc3339(),
            last_updated: s.last_updated.to_rfc3339(),
        }
    }
}
