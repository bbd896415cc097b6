use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

fn invalid(raw: &str) -> AppError {
    AppError::InvalidDate(raw.to_string())
}

/// First and last day covered by a single `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn bounds_of(part: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match part.len() {
        4 => {
            let y: i32 = part.parse().map_err(|_| invalid(part))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(part))?;
            let last = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(part))?;
            Ok((first, last))
        }
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{part}-01"), "%Y-%m-%d")
                .map_err(|_| invalid(part))?;
            Ok((first, month_last_day(first)))
        }
        10 => {
            let d = NaiveDate::parse_from_str(part, "%Y-%m-%d").map_err(|_| invalid(part))?;
            Ok((d, d))
        }
        _ => Err(invalid(part)),
    }
}

fn month_last_day(first: NaiveDate) -> NaiveDate {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// Parse `--range`.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or two of the same shape joined by
/// `:` (`2025-01:2025-03`). Returns inclusive bounds.
pub(crate) fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match r.split_once(':') {
        Some((start, end)) => {
            let (start, end) = (start.trim(), end.trim());
            if start.len() != end.len() {
                return Err(AppError::InvalidDate(format!(
                    "{r}: start and end must have the same format"
                )));
            }
            let (from, _) = bounds_of(start)?;
            let (_, to) = bounds_of(end)?;
            Ok((from, to))
        }
        None => bounds_of(r.trim()),
    }
}
