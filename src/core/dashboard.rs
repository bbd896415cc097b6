use crate::config::Config;
use crate::core::aggregate::{
    DashboardSummary, SourceSlice, dashboard_summary, expenses_in_month, income_by_source,
    percentage,
};
use crate::errors::{AppError, AppResult};
use crate::models::category::UserCategory;
use crate::models::expense::ExpenseItem;
use crate::models::income::IncomeItem;
use crate::models::savings::SavingsItem;
use crate::store;
use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

/// One of the user's categories with what was spent under its catalog id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: UserCategory,
    pub total: f64,
    /// Share of all expenses, not only this month's.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub year: i32,
    pub month: u32,
    pub summary: DashboardSummary,
    pub income_sources: Vec<SourceSlice>,
    pub categories: Vec<CategoryShare>,
}

/// `YYYY-MM` → (year, month). `None` means the current month.
pub fn parse_period(raw: Option<&str>) -> AppResult<(i32, u32)> {
    match raw {
        None => {
            let today = Utc::now().date_naive();
            Ok((today.year(), today.month()))
        }
        Some(p) => NaiveDate::parse_from_str(&format!("{}-01", p.trim()), "%Y-%m-%d")
            .map(|d| (d.year(), d.month()))
            .map_err(|_| AppError::InvalidDate(p.to_string())),
    }
}

pub fn category_shares(categories: &[UserCategory], expenses: &[ExpenseItem]) -> Vec<CategoryShare> {
    let all: f64 = expenses.iter().map(|e| e.amount).sum();

    categories
        .iter()
        .map(|c| {
            let total: f64 = expenses
                .iter()
                .filter(|e| e.category_id == c.category_id)
                .map(|e| e.amount)
                .sum();
            CategoryShare {
                category: c.clone(),
                total,
                percentage: percentage(total, all),
            }
        })
        .collect()
}

pub struct DashboardLogic;

impl DashboardLogic {
    pub fn load(conn: &Connection, cfg: &Config, user_id: &str, period: (i32, u32)) -> AppResult<Dashboard> {
        let storage = &cfg.storage;
        let income = store::open::<IncomeItem>(conn, storage.income, user_id).list()?;
        let expenses = store::open::<ExpenseItem>(conn, storage.expenses, user_id).list()?;
        let savings = store::open::<SavingsItem>(conn, storage.savings, user_id).list()?;
        let categories = store::open::<UserCategory>(conn, storage.categories, user_id).list()?;

        let (year, month) = period;
        let month_expenses = expenses_in_month(&expenses, year, month);

        Ok(Dashboard {
            year,
            month,
            summary: dashboard_summary(&income, &month_expenses, &savings),
            income_sources: income_by_source(&income),
            categories: category_shares(&categories, &expenses),
        })
    }
}
