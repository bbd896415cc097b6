use crate::core::validation::ValidationErrors;
use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}{}====================== {}\n{}",
        FG_BLUE, BOLD, msg, RESET
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Dismissible notification: a title line plus a dimmed description.
pub fn toast<T: fmt::Display, D: fmt::Display>(kind: ToastKind, title: T, description: D) {
    match kind {
        ToastKind::Success => {
            success(title);
            println!("   {}{}{}", DIM, description, RESET);
        }
        ToastKind::Error => {
            error(title);
            eprintln!("   {}{}{}", DIM, description, RESET);
        }
    }
}

/// Print one line per invalid field, the way a form shows messages under its inputs.
pub fn field_errors(errors: &ValidationErrors) {
    for issue in errors.issues() {
        eprintln!("   {}{}{}: {}", FG_RED, issue.field, RESET, issue.message);
    }
}
