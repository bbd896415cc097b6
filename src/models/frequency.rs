use serde::{Deserialize, Serialize};

const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Recurrence period of an income source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    PerWeek,
    PerMonth,
    PerYear,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::PerWeek, Frequency::PerMonth, Frequency::PerYear];

    /// Stored representation (`per-week`, `per-month`, `per-year`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::PerWeek => "per-week",
            Frequency::PerMonth => "per-month",
            Frequency::PerYear => "per-year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::PerWeek => "Per Week",
            Frequency::PerMonth => "Per Month",
            Frequency::PerYear => "Per Year",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "per-week" => Some(Frequency::PerWeek),
            "per-month" => Some(Frequency::PerMonth),
            "per-year" => Some(Frequency::PerYear),
            _ => None,
        }
    }

    /// Helper: accept CLI input in either the stored form or a plain adjective.
    pub fn from_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "per-week" | "weekly" | "week" | "w" => Some(Frequency::PerWeek),
            "per-month" | "monthly" | "month" | "m" => Some(Frequency::PerMonth),
            "per-year" | "yearly" | "year" | "annual" | "y" => Some(Frequency::PerYear),
            _ => None,
        }
    }

    /// Amount received per month for an income paid at this frequency.
    pub fn to_monthly(&self, amount: f64) -> f64 {
        match self {
            Frequency::PerWeek => amount * WEEKS_PER_YEAR / MONTHS_PER_YEAR,
            Frequency::PerMonth => amount,
            Frequency::PerYear => amount / MONTHS_PER_YEAR,
        }
    }

    /// Amount received per year for an income paid at this frequency.
    pub fn to_yearly(&self, amount: f64) -> f64 {
        match self {
            Frequency::PerWeek => amount * WEEKS_PER_YEAR,
            Frequency::PerMonth => amount * MONTHS_PER_YEAR,
            Frequency::PerYear => amount,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
