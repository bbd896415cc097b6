//! Request-level operations over the signed-in user's data.
//!
//! Every action checks the session first and answers with an
//! `ActionResponse`; failures are reported in the response, never raised, so
//! callers decide how to present them.

pub mod expenses;
pub mod income;
pub mod user;

use crate::config::Config;
use crate::core::auth::session_user;
use crate::core::validation::ValidationErrors;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use rusqlite::Connection;
use serde::Serialize;

pub const UNAUTHORIZED: &str = "Unauthorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse<T> {
    pub error: Option<String>,
    pub message: String,
    pub data: Option<T>,
    /// Per-field problems when the request failed validation.
    #[serde(skip)]
    pub issues: Option<ValidationErrors>,
}

impl<T> ActionResponse<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            error: None,
            message: message.to_string(),
            data: Some(data),
            issues: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            message: message.to_string(),
            data: None,
            issues: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self::failure(UNAUTHORIZED)
    }

    pub fn invalid(message: &str, issues: ValidationErrors) -> Self {
        Self {
            error: Some(issues.to_string()),
            message: message.to_string(),
            data: None,
            issues: Some(issues),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.error.as_deref() == Some(UNAUTHORIZED)
    }

    /// Turn the response back into a `Result` for callers that propagate errors.
    pub fn into_result(self) -> AppResult<Option<T>> {
        if self.is_unauthorized() {
            return Err(AppError::Unauthorized);
        }
        if let Some(issues) = self.issues {
            return Err(AppError::Validation(issues));
        }
        match self.error {
            None => Ok(self.data),
            Some(e) => Err(AppError::Other(e)),
        }
    }
}

/// What an action needs to run: the database and the configuration that picks
/// storage backends and locates the session.
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    pub conn: &'a Connection,
    pub cfg: &'a Config,
}

impl<'a> ActionContext<'a> {
    pub fn new(conn: &'a Connection, cfg: &'a Config) -> Self {
        Self { conn, cfg }
    }

    /// The signed-in user. A broken session lookup counts as signed out.
    fn user(&self) -> Option<User> {
        session_user(self.conn, self.cfg).ok().flatten()
    }
}
