//! Outgoing mail: templates plus the `Mailer` seam.
//!
//! Nothing is delivered over the network. `OutboxMailer` stores each message in
//! the `outbox` table and prints a notice; `budgety auth outbox` lists them.

use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::models::user::OtpPurpose;
use crate::ui::messages::info;
use chrono::{Datelike, Utc};
use rusqlite::{Connection, params};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

pub trait Mailer {
    fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

pub struct OutboxMailer<'c> {
    conn: &'c Connection,
    from: String,
}

impl<'c> OutboxMailer<'c> {
    pub fn new(conn: &'c Connection, from: &str) -> Self {
        Self {
            conn,
            from: from.to_string(),
        }
    }
}

impl Mailer for OutboxMailer<'_> {
    fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO outbox (sender, recipient, subject, body, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.from,
                message.to,
                message.subject,
                message.text,
                Utc::now().to_rfc3339()
            ],
        )?;

        ttlog_quiet(self.conn, "mail", &message.to, &message.subject);
        info(format!("Email queued for {}: {}", message.to, message.subject));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    pub id: i64,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub sent_at: String,
}

/// Most recent messages first, optionally only those for one recipient.
pub fn list_outbox(conn: &Connection, recipient: Option<&str>) -> AppResult<Vec<OutboxEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, recipient, subject, body, sent_at FROM outbox
         WHERE ?1 IS NULL OR recipient = ?1
         ORDER BY id DESC",
    )?;

    let rows = stmt.query_map([recipient], |row| {
        Ok(OutboxEntry {
            id: row.get(0)?,
            recipient: row.get(1)?,
            subject: row.get(2)?,
            body: row.get(3)?,
            sent_at: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Templates
// ---------------------------

fn otp_wording(purpose: OtpPurpose) -> (&'static str, &'static str, &'static str) {
    match purpose {
        OtpPurpose::SignIn => (
            "Your Sign-In Code - Budgety",
            "Sign In to Your Account",
            "Use this code to sign in to your Budgety account:",
        ),
        OtpPurpose::EmailVerification => (
            "Your Email Verification Code - Budgety",
            "Verify Your Email",
            "Use this code to verify your email address:",
        ),
        OtpPurpose::ForgetPassword => (
            "Your Password Reset Code - Budgety",
            "Reset Your Password",
            "Use this code to reset your password:",
        ),
    }
}

pub fn otp_email(to: &str, code: &str, purpose: OtpPurpose, ttl_minutes: i64) -> EmailMessage {
    let (subject, heading, message) = otp_wording(purpose);
    let year = Utc::now().year();

    let text = format!(
        "Budgety - {heading}\n\
         \n\
         {message}\n\
         \n\
         Your code: {code}\n\
         \n\
         This code will expire in {ttl_minutes} minutes.\n\
         \n\
         If you didn't request this code, please ignore this email.\n\
         \n\
         © {year} Budgety. All rights reserved.\n"
    );

    EmailMessage {
        to: to.to_string(),
        subject: subject.to_string(),
        text,
    }
}

/// Sent once an account's address is confirmed.
pub fn welcome_email(to: &str, name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Welcome to Budgety".to_string(),
        text: format!(
            "Hi {name},\n\nYour email address is verified. You can now track income, \
             expenses and savings goals with Budgety.\n"
        ),
    }
}

