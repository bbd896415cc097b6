//! Input schemas.
//!
//! Every add/edit command builds one of the `*Form` structs from raw flag
//! values and calls `parse()`. Parsing either yields a typed, validated value
//! or a `ValidationErrors` listing one message per offending field. Nothing is
//! persisted unless parsing succeeded.

use crate::models::category::find_catalog;
use crate::models::frequency::Frequency;
use crate::models::savings::SavingsType;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.issues.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldError] {
        &self.issues
    }

    /// First message reported for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.issues
            .iter()
            .find(|i| i.field == field)
            .map(|i| i.message.as_str())
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("  {}: {}", i.field, i.message))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------
// Field helpers
// ---------------------------

fn required_text(errors: &mut ValidationErrors, field: &'static str, raw: &str, message: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, message);
    }
    value.to_string()
}

fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            errors.add(field, "Expected a number");
            None
        }
    }
}

fn positive_amount(errors: &mut ValidationErrors, field: &'static str, raw: &str, message: &str) -> f64 {
    match number(errors, field, raw) {
        Some(v) if v > 0.0 => v,
        Some(_) => {
            errors.add(field, message);
            0.0
        }
        None => 0.0,
    }
}

fn catalog_id(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(id) if id >= 1 && find_catalog(id).is_some() => id,
        _ => {
            errors.add(field, "Please select a category");
            0
        }
    }
}

// ---------------------------
// Income
// ---------------------------

#[derive(Debug, Clone, Default)]
pub struct IncomeForm {
    pub amount: String,
    pub source: String,
    pub frequency: String,
    pub income_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidIncome {
    pub amount: f64,
    pub source: String,
    pub frequency: Frequency,
    pub income_name: String,
}

impl IncomeForm {
    pub fn parse(&self) -> Result<ValidIncome, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let amount = positive_amount(&mut errors, "amount", &self.amount, "Amount must be greater than 0");
        let source = required_text(&mut errors, "source", &self.source, "Please select an income source")
            .to_lowercase();

        let frequency = if self.frequency.trim().is_empty() {
            errors.add("frequency", "Please select a frequency");
            None
        } else {
            let parsed = Frequency::from_input(&self.frequency);
            if parsed.is_none() {
                errors.add("frequency", "Frequency must be per-week, per-month or per-year");
            }
            parsed
        };

        let income_name = required_text(&mut errors, "income_name", &self.income_name, "Income name is required");

        errors.finish(|| ValidIncome {
            amount,
            source,
            frequency: frequency.unwrap_or(Frequency::PerMonth),
            income_name,
        })
    }
}

// ---------------------------
// Expense
// ---------------------------

#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub amount: String,
    pub category_id: String,
    pub description: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub amount: f64,
    pub category_id: u32,
    pub description: String,
    pub notes: Option<String>,
}

impl ExpenseForm {
    pub fn parse(&self) -> Result<ValidExpense, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let amount = positive_amount(&mut errors, "amount", &self.amount, "Amount must be greater than 0");
        let category_id = catalog_id(&mut errors, "categoryId", &self.category_id);
        let description = required_text(&mut errors, "description", &self.description, "Description is required");
        let notes = optional_text(self.notes.as_deref());

        errors.finish(|| ValidExpense {
            amount,
            category_id,
            description,
            notes,
        })
    }
}

// ---------------------------
// Savings
// ---------------------------

#[derive(Debug, Clone, Default)]
pub struct SavingsForm {
    pub name: String,
    pub kind: String,
    pub bank_name: String,
    pub account_number: Option<String>,
    pub current_amount: String,
    pub goal_amount: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidSavings {
    pub name: String,
    pub kind: SavingsType,
    pub bank_name: String,
    pub account_number: Option<String>,
    pub current_amount: f64,
    pub goal_amount: f64,
    pub notes: Option<String>,
}

impl SavingsForm {
    pub fn parse(&self) -> Result<ValidSavings, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", &self.name, "Savings name is required");

        let kind = SavingsType::from_input(&self.kind);
        if kind.is_none() {
            errors.add("type", "Please select a savings type");
        }

        let bank_name = required_text(&mut errors, "bankName", &self.bank_name, "Bank name is required");

        // An empty current amount means nothing saved yet.
        let current_amount = if self.current_amount.trim().is_empty() {
            0.0
        } else {
            match number(&mut errors, "currentAmount", &self.current_amount) {
                Some(v) if v < 0.0 => {
                    errors.add("currentAmount", "Current amount must be 0 or greater");
                    v
                }
                Some(v) => v,
                None => 0.0,
            }
        };

        let goal_amount = positive_amount(
            &mut errors,
            "goalAmount",
            &self.goal_amount,
            "Goal amount must be greater than 0",
        );

        errors.finish(|| ValidSavings {
            name,
            kind: kind.unwrap_or(SavingsType::Other),
            bank_name,
            account_number: optional_text(self.account_number.as_deref()),
            current_amount,
            goal_amount,
            notes: optional_text(self.notes.as_deref()),
        })
    }
}

// ---------------------------
// Category
// ---------------------------

#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub category_id: String,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidCategory {
    pub category_id: u32,
    pub category_name: String,
}

impl CategoryForm {
    pub fn parse(&self) -> Result<ValidCategory, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let category_id = catalog_id(&mut errors, "categoryId", &self.category_id);
        let category_name =
            required_text(&mut errors, "categoryName", &self.category_name, "Category name is required");

        errors.finish(|| ValidCategory {
            category_id,
            category_name,
        })
    }
}

// ---------------------------
// Sign up / passwords
// ---------------------------

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidSignUp {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn check_password(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }
}

/// Validate a new password on its own (password reset).
pub fn validate_password(password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_password(&mut errors, "password", password);
    errors.finish(|| ())
}

pub fn validate_email(raw: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let email = normalize_email(raw);
    if !EMAIL_RE.is_match(&email) {
        errors.add("email", "Invalid email address");
    }
    errors.finish(|| email)
}

impl SignUpForm {
    pub fn parse(&self) -> Result<ValidSignUp, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let full_name = required_text(&mut errors, "fullName", &self.full_name, "Full name is required");

        let email = normalize_email(&self.email);
        if !EMAIL_RE.is_match(&email) {
            errors.add("email", "Invalid email address");
        }

        check_password(&mut errors, "password", &self.password);
        check_password(&mut errors, "confirmPassword", &self.confirm_password);

        if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }

        errors.finish(|| ValidSignUp {
            full_name,
            email,
            password: self.password.clone(),
        })
    }
}
