//! Totals, percentages and per-period conversion for the summary views.

use crate::models::category::{CATALOG, CatalogCategory, OTHER_CATEGORY, find_catalog};
use crate::models::expense::ExpenseItem;
use crate::models::frequency::Frequency;
use crate::models::income::{IncomeItem, source_color};
use crate::models::savings::SavingsItem;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------
// Income
// ---------------------------

/// Raw sums per frequency plus the normalized equivalents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IncomeTotals {
    pub per_week: f64,
    pub per_month: f64,
    pub per_year: f64,
    /// Plain sum of every amount, regardless of frequency.
    pub total: f64,
    pub monthly_equivalent: f64,
    pub yearly_equivalent: f64,
}

pub fn income_totals(items: &[IncomeItem]) -> IncomeTotals {
    items.iter().fold(IncomeTotals::default(), |mut acc, item| {
        match item.frequency {
            Frequency::PerWeek => acc.per_week += item.amount,
            Frequency::PerMonth => acc.per_month += item.amount,
            Frequency::PerYear => acc.per_year += item.amount,
        }
        acc.total += item.amount;
        acc.monthly_equivalent += item.frequency.to_monthly(item.amount);
        acc.yearly_equivalent += item.frequency.to_yearly(item.amount);
        acc
    })
}

/// One slice of the income-by-source chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSlice {
    pub source: String,
    /// Monthly-normalized amount.
    pub amount: f64,
    pub percentage: f64,
    pub color: &'static str,
}

/// Merge income by source, in order of first appearance.
pub fn income_by_source(items: &[IncomeItem]) -> Vec<SourceSlice> {
    let mut slices: Vec<SourceSlice> = Vec::new();

    for item in items {
        let monthly = item.monthly_amount();
        match slices.iter_mut().find(|s| s.source == item.source) {
            Some(existing) => existing.amount += monthly,
            None => slices.push(SourceSlice {
                source: item.source.clone(),
                amount: monthly,
                percentage: 0.0,
                color: source_color(&item.source),
            }),
        }
    }

    let total: f64 = slices.iter().map(|s| s.amount).sum();
    for s in &mut slices {
        s.percentage = percentage(s.amount, total);
    }
    slices
}

// ---------------------------
// Expenses
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    pub category_id: u32,
    pub category_name: String,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseStats {
    pub total: f64,
    pub category_totals: BTreeMap<u32, f64>,
    /// Highest-spending category; ties keep the lowest id.
    pub top_category: Option<TopCategory>,
}

pub fn expense_stats(items: &[ExpenseItem]) -> ExpenseStats {
    let total = items.iter().map(|e| e.amount).sum();

    let mut category_totals: BTreeMap<u32, f64> = BTreeMap::new();
    for e in items {
        *category_totals.entry(e.category_id).or_insert(0.0) += e.amount;
    }

    let top_category = category_totals
        .iter()
        .fold(None::<TopCategory>, |best, (&id, &sum)| match best {
            Some(b) if b.total >= sum => Some(b),
            _ => Some(TopCategory {
                category_id: id,
                category_name: find_catalog(id)
                    .map(|c| c.name.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
                total: sum,
            }),
        });

    ExpenseStats {
        total,
        category_totals,
        top_category,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpendingLevel {
    High,
    Medium,
    Low,
}

impl SpendingLevel {
    pub fn from_percentage(p: f64) -> Self {
        if p > 20.0 {
            SpendingLevel::High
        } else if p > 10.0 {
            SpendingLevel::Medium
        } else {
            SpendingLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpendingLevel::High => "High spending",
            SpendingLevel::Medium => "Moderate spending",
            SpendingLevel::Low => "Low spending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: CatalogCategory,
    pub total_amount: f64,
    pub transaction_count: usize,
    pub average_amount: f64,
    pub percentage: f64,
    pub last_expense_date: Option<DateTime<Utc>>,
}

impl CategoryBreakdown {
    pub fn level(&self) -> SpendingLevel {
        SpendingLevel::from_percentage(self.percentage)
    }
}

/// One row per catalog category, highest total first.
pub fn category_breakdown(items: &[ExpenseItem]) -> Vec<CategoryBreakdown> {
    let total: f64 = items.iter().map(|e| e.amount).sum();

    let mut rows: Vec<CategoryBreakdown> = CATALOG
        .iter()
        .map(|category| {
            let in_category: Vec<&ExpenseItem> = items
                .iter()
                .filter(|e| find_catalog(e.category_id).unwrap_or(OTHER_CATEGORY).id == category.id)
                .collect();
            let sum: f64 = in_category.iter().map(|e| e.amount).sum();
            let count = in_category.len();

            CategoryBreakdown {
                category: *category,
                total_amount: sum,
                transaction_count: count,
                average_amount: if count > 0 { sum / count as f64 } else { 0.0 },
                percentage: percentage(sum, total),
                last_expense_date: in_category.iter().map(|e| e.date).max(),
            }
        })
        .collect();

    // Stable: equal totals keep catalog order.
    rows.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    rows
}

/// Expenses dated within the given calendar month.
pub fn expenses_in_month(items: &[ExpenseItem], year: i32, month: u32) -> Vec<ExpenseItem> {
    items
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .cloned()
        .collect()
}

// ---------------------------
// Savings
// ---------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SavingsTotals {
    pub total_current: f64,
    pub total_goal: f64,
    pub total_remaining: f64,
    pub overall_progress: f64,
}

pub fn savings_totals(items: &[SavingsItem]) -> SavingsTotals {
    let total_current: f64 = items.iter().map(|s| s.current_amount).sum();
    let total_goal: f64 = items.iter().map(|s| s.goal_amount).sum();

    SavingsTotals {
        total_current,
        total_goal,
        total_remaining: total_goal - total_current,
        overall_progress: percentage(total_current, total_goal),
    }
}

/// Progress towards a goal in percent: 0 for a zero goal, never above 100.
pub fn savings_progress(current: f64, goal: f64) -> f64 {
    if goal == 0.0 {
        return 0.0;
    }
    (current / goal * 100.0).min(100.0)
}

// ---------------------------
// Dashboard
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub income: IncomeTotals,
    pub month_expenses: f64,
    pub savings_total: f64,
    /// Monthly income minus this month's expenses.
    pub remaining_balance: f64,
    /// This month's expenses as a share of monthly income.
    pub expense_ratio: f64,
    pub savings_ratio: f64,
}

pub fn dashboard_summary(
    income: &[IncomeItem],
    month_expenses: &[ExpenseItem],
    savings: &[SavingsItem],
) -> DashboardSummary {
    let income = income_totals(income);
    let spent: f64 = month_expenses.iter().map(|e| e.amount).sum();
    let saved = savings_totals(savings);

    DashboardSummary {
        income,
        month_expenses: spent,
        savings_total: saved.total_current,
        remaining_balance: income.monthly_equivalent - spent,
        expense_ratio: percentage(spent, income.monthly_equivalent),
        savings_ratio: saved.overall_progress,
    }
}

/// `part / whole` in percent, 0 when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}
