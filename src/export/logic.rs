use crate::config::Config;
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{ExpenseExport, IncomeExport, SavingsExport};
use crate::export::range::parse_range;
use crate::export::{ExportFormat, ExportTarget, notify_export_success};
use crate::models::expense::ExpenseItem;
use crate::models::income::IncomeItem;
use crate::models::savings::SavingsItem;
use crate::store;
use crate::ui::messages::warning;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

type Bounds = Option<(NaiveDate, NaiveDate)>;

fn in_bounds(ts: &DateTime<Utc>, bounds: Bounds) -> bool {
    bounds.is_none_or(|(from, to)| {
        let d = ts.date_naive();
        d >= from && d <= to
    })
}

fn write_rows<T: Serialize>(rows: &[T], format: ExportFormat, path: &Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => export_csv(rows, path),
        ExportFormat::Json => export_json(rows, path),
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export one of the signed-in user's collections.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"`, or `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and
    ///   `start:end` pairs of those, matched against each record's date
    ///
    /// Returns the number of exported rows.
    #[allow(clippy::too_many_arguments)]
    pub fn export(
        conn: &Connection,
        cfg: &Config,
        user_id: &str,
        what: ExportTarget,
        format: ExportFormat,
        file: &str,
        range: &Option<String>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let bounds: Bounds = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        ensure_writable(path, force)?;

        let count = match what {
            ExportTarget::Income => {
                let rows: Vec<IncomeExport> =
                    store::open::<IncomeItem>(conn, cfg.storage.income, user_id)
                        .list()?
                        .iter()
                        .filter(|i| in_bounds(&i.created_at, bounds))
                        .map(IncomeExport::from)
                        .collect();
                Self::finish(&rows, format, path)?
            }
            ExportTarget::Expenses => {
                let rows: Vec<ExpenseExport> =
                    store::open::<ExpenseItem>(conn, cfg.storage.expenses, user_id)
                        .list()?
                        .iter()
                        .filter(|e| in_bounds(&e.date, bounds))
                        .map(ExpenseExport::from)
                        .collect();
                Self::finish(&rows, format, path)?
            }
            ExportTarget::Savings => {
                let rows: Vec<SavingsExport> =
                    store::open::<SavingsItem>(conn, cfg.storage.savings, user_id)
                        .list()?
                        .iter()
                        .filter(|s| in_bounds(&s.date, bounds))
                        .map(SavingsExport::from)
                        .collect();
                Self::finish(&rows, format, path)?
            }
        };

        if count > 0 {
            notify_export_success(&format.as_str().to_uppercase(), path);
            ttlog(
                conn,
                "export",
                &path.to_string_lossy(),
                &format!("{} {} rows as {}", count, what.as_str(), format.as_str()),
            )?;
        }

        Ok(count)
    }

    fn finish<T: Serialize>(rows: &[T], format: ExportFormat, path: &Path) -> AppResult<usize> {
        if rows.is_empty() {
            warning("No records found for the selected range. Nothing to export.");
            return Ok(0);
        }
        write_rows(rows, format, path)?;
        Ok(rows.len())
    }
}
