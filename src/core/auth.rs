//! Accounts, one-time codes and sessions.
//!
//! Passwords are stored as PBKDF2-HMAC-SHA256 digests with a per-user random
//! salt. A successful sign-in creates a row in `sessions`; the CLI keeps the
//! token in a file next to the database so later commands run as that user.

use crate::config::Config;
use crate::core::email::{Mailer, otp_email, welcome_email};
use crate::core::validation::{SignUpForm, validate_email, validate_password};
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::user::{OtpPurpose, Session, User};
use crate::store::sql::read_timestamp;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD as B64, URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeDelta, Utc};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use rusqlite::{Connection, OptionalExtension, Row, params};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use std::fs;

pub const OTP_LENGTH: usize = 6;
pub const MAX_OTP_ATTEMPTS: i64 = 3;
const SALT_LEN: usize = 16;
const TOKEN_LEN: usize = 32;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------
// Hashing
// ---------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
    pub iterations: u32,
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations.max(1), &mut key);
    key
}

pub fn hash_password(password: &str, iterations: u32) -> PasswordHash {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt, iterations);

    PasswordHash {
        hash: B64.encode(key),
        salt: B64.encode(salt),
        iterations: iterations.max(1),
    }
}

pub fn verify_password(password: &str, stored: &PasswordHash) -> bool {
    let Ok(salt) = B64.decode(&stored.salt) else {
        return false;
    };
    let Ok(expected) = B64.decode(&stored.hash) else {
        return false;
    };
    derive_key(password, &salt, stored.iterations)
        .ct_eq(expected.as_slice())
        .into()
}

/// `now + ttl`, refusing non-positive or out-of-range lifetimes.
fn expiry(now: DateTime<Utc>, ttl: Option<TimeDelta>, setting: &str) -> AppResult<DateTime<Utc>> {
    ttl.filter(|d| *d > TimeDelta::zero())
        .and_then(|d| now.checked_add_signed(d))
        .ok_or_else(|| AppError::Config(format!("{setting} is out of range")))
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_LEN];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn new_otp() -> String {
    let max = 10u32.pow(OTP_LENGTH as u32);
    format!("{:0width$}", rand::thread_rng().gen_range(0..max), width = OTP_LENGTH)
}

// ---------------------------
// Users
// ---------------------------

const USER_COLUMNS: &str = "id, name, email, email_verified, image, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        email_verified: row.get::<_, i64>("email_verified")? != 0,
        image: row.get("image")?,
        created_at: read_timestamp(row, "created_at")?,
        updated_at: read_timestamp(row, "updated_at")?,
    })
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            [email],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn find_user_by_id(conn: &Connection, id: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn stored_password(conn: &Connection, user_id: &str) -> AppResult<PasswordHash> {
    let stored = conn.query_row(
        "SELECT password_hash, password_salt, password_iterations FROM users WHERE id = ?1",
        [user_id],
        |row| {
            Ok(PasswordHash {
                hash: row.get(0)?,
                salt: row.get(1)?,
                iterations: row.get(2)?,
            })
        },
    )?;
    Ok(stored)
}

fn mark_verified(conn: &Connection, user_id: &str) -> AppResult<()> {
    conn.execute(
        "UPDATE users SET email_verified = 1, updated_at = ?2 WHERE id = ?1",
        params![user_id, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

// ---------------------------
// Service
// ---------------------------

pub struct Auth<'a> {
    conn: &'a Connection,
    cfg: &'a Config,
    mailer: &'a dyn Mailer,
}

impl<'a> Auth<'a> {
    pub fn new(conn: &'a Connection, cfg: &'a Config, mailer: &'a dyn Mailer) -> Self {
        Self { conn, cfg, mailer }
    }

    /// Create an unverified account and mail an email-verification code.
    pub fn sign_up(&self, form: &SignUpForm) -> AppResult<User> {
        let valid = form.parse()?;

        if find_user_by_email(self.conn, &valid.email)?.is_some() {
            return Err(AppError::Auth(format!(
                "An account already exists for {}",
                valid.email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: valid.full_name,
            email: valid.email,
            email_verified: false,
            image: None,
            created_at: now,
            updated_at: now,
        };
        let password = hash_password(&valid.password, self.cfg.password_iterations);

        self.conn.execute(
            "INSERT INTO users (id, name, email, email_verified, password_hash, password_salt,
                                password_iterations, image, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, NULL, ?7, ?7)",
            params![
                user.id,
                user.name,
                user.email,
                password.hash,
                password.salt,
                password.iterations,
                now.to_rfc3339()
            ],
        )?;

        ttlog(self.conn, "signup", &user.email, "Account created")?;
        self.send_otp(&user.email, OtpPurpose::EmailVerification)?;

        Ok(user)
    }

    /// Issue a fresh code for `purpose`, replacing any earlier one, and mail it.
    pub fn send_otp(&self, email: &str, purpose: OtpPurpose) -> AppResult<()> {
        let email = validate_email(email)?;

        if find_user_by_email(self.conn, &email)?.is_none() {
            return Err(AppError::Auth(format!("No account found for {email}")));
        }

        let now = Utc::now();
        let expires_at = expiry(
            now,
            TimeDelta::try_minutes(self.cfg.otp_ttl_minutes),
            "otp_ttl_minutes",
        )?;

        self.conn.execute(
            "DELETE FROM verifications WHERE email = ?1 AND purpose = ?2",
            params![email, purpose.as_str()],
        )?;

        let code = new_otp();

        self.conn.execute(
            "INSERT INTO verifications (email, purpose, code, attempts, expires_at, created_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
            params![
                email,
                purpose.as_str(),
                code,
                expires_at.to_rfc3339(),
                now.to_rfc3339()
            ],
        )?;

        self.mailer
            .send(&otp_email(&email, &code, purpose, self.cfg.otp_ttl_minutes))
    }

    /// Check a code. A correct code is consumed; a wrong one counts as an
    /// attempt and the code is dropped after `MAX_OTP_ATTEMPTS`.
    fn consume_otp(&self, email: &str, purpose: OtpPurpose, code: &str) -> AppResult<()> {
        let row: Option<(i64, String, i64, String)> = self
            .conn
            .query_row(
                "SELECT id, code, attempts, expires_at FROM verifications
                 WHERE email = ?1 AND purpose = ?2
                 ORDER BY id DESC LIMIT 1",
                params![email, purpose.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((id, expected, attempts, expires_at)) = row else {
            return Err(AppError::Auth("Invalid or expired code".into()));
        };

        let expires_at = DateTime::parse_from_rfc3339(&expires_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| AppError::Other(format!("corrupt verification expiry: {e}")))?;

        if expires_at <= Utc::now() {
            self.conn
                .execute("DELETE FROM verifications WHERE id = ?1", [id])?;
            return Err(AppError::Auth("Code expired, request a new one".into()));
        }

        if expected != code.trim() {
            if attempts + 1 >= MAX_OTP_ATTEMPTS {
                self.conn
                    .execute("DELETE FROM verifications WHERE id = ?1", [id])?;
                return Err(AppError::Auth(
                    "Too many attempts, request a new code".into(),
                ));
            }
            self.conn.execute(
                "UPDATE verifications SET attempts = attempts + 1 WHERE id = ?1",
                [id],
            )?;
            return Err(AppError::Auth("Invalid code".into()));
        }

        self.conn
            .execute("DELETE FROM verifications WHERE id = ?1", [id])?;
        Ok(())
    }

    fn existing_user(&self, email: &str) -> AppResult<User> {
        let email = validate_email(email)?;
        find_user_by_email(self.conn, &email)?
            .ok_or_else(|| AppError::Auth(format!("No account found for {email}")))
    }

    /// Confirm the address with the emailed code and sign the user in.
    pub fn verify_email(&self, email: &str, code: &str) -> AppResult<(User, Session)> {
        let user = self.existing_user(email)?;
        self.consume_otp(&user.email, OtpPurpose::EmailVerification, code)?;

        mark_verified(self.conn, &user.id)?;
        ttlog(self.conn, "verify", &user.email, "Email verified")?;
        self.mailer.send(&welcome_email(&user.email, &user.name))?;

        let session = self.create_session(&user.id)?;
        Ok((User { email_verified: true, ..user }, session))
    }

    pub fn sign_in_password(&self, email: &str, password: &str) -> AppResult<(User, Session)> {
        let email = validate_email(email)?;
        let user = find_user_by_email(self.conn, &email)?
            .ok_or_else(|| AppError::Auth(INVALID_CREDENTIALS.into()))?;

        if !verify_password(password, &stored_password(self.conn, &user.id)?) {
            ttlog(self.conn, "login_failed", &user.email, "Wrong password")?;
            return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
        }

        if !user.email_verified {
            return Err(AppError::Auth(
                "Email not verified. Run `budgety auth verify` with the code we sent".into(),
            ));
        }

        let session = self.create_session(&user.id)?;
        ttlog(self.conn, "login", &user.email, "Signed in with password")?;
        Ok((user, session))
    }

    /// Sign in with an emailed code. Receiving the code proves the address.
    pub fn sign_in_otp(&self, email: &str, code: &str) -> AppResult<(User, Session)> {
        let user = self.existing_user(email)?;
        self.consume_otp(&user.email, OtpPurpose::SignIn, code)?;

        if !user.email_verified {
            mark_verified(self.conn, &user.id)?;
        }

        let session = self.create_session(&user.id)?;
        ttlog(self.conn, "login", &user.email, "Signed in with one-time code")?;
        Ok((
            User {
                email_verified: true,
                ..user
            },
            session,
        ))
    }

    /// Set a new password with a forget-password code; every open session is revoked.
    pub fn reset_password(&self, email: &str, code: &str, new_password: &str) -> AppResult<()> {
        validate_password(new_password)?;
        let user = self.existing_user(email)?;
        self.consume_otp(&user.email, OtpPurpose::ForgetPassword, code)?;

        let password = hash_password(new_password, self.cfg.password_iterations);
        self.conn.execute(
            "UPDATE users SET password_hash = ?2, password_salt = ?3, password_iterations = ?4,
                              updated_at = ?5
             WHERE id = ?1",
            params![
                user.id,
                password.hash,
                password.salt,
                password.iterations,
                Utc::now().to_rfc3339()
            ],
        )?;
        self.conn
            .execute("DELETE FROM sessions WHERE user_id = ?1", [&user.id])?;

        ttlog(self.conn, "reset_password", &user.email, "Password changed")?;
        Ok(())
    }

    pub fn create_session(&self, user_id: &str) -> AppResult<Session> {
        let now = Utc::now();
        let session = Session {
            token: new_token(),
            user_id: user_id.to_string(),
            expires_at: expiry(
                now,
                TimeDelta::try_days(self.cfg.session_ttl_days),
                "session_ttl_days",
            )?,
        };

        self.conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id,
                session.expires_at.to_rfc3339(),
                now.to_rfc3339()
            ],
        )?;
        Ok(session)
    }
}

/// User owning a live session. Expired sessions are removed on sight.
pub fn current_user(conn: &Connection, token: &str) -> AppResult<Option<User>> {
    let session = conn
        .query_row(
            "SELECT token, user_id, expires_at FROM sessions WHERE token = ?1",
            [token],
            |row| {
                Ok(Session {
                    token: row.get(0)?,
                    user_id: row.get(1)?,
                    expires_at: read_timestamp(row, "expires_at")?,
                })
            },
        )
        .optional()?;

    let Some(session) = session else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
        return Ok(None);
    }

    find_user_by_id(conn, &session.user_id)
}

pub fn sign_out(conn: &Connection, token: &str) -> AppResult<bool> {
    let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
    Ok(removed > 0)
}

// ---------------------------
// Session file
// ---------------------------

pub fn save_session_token(cfg: &Config, token: &str) -> AppResult<()> {
    let path = cfg.session_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token)?;
    Ok(())
}

pub fn load_session_token(cfg: &Config) -> Option<String> {
    fs::read_to_string(cfg.session_file())
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn clear_session_token(cfg: &Config) -> AppResult<()> {
    let path = cfg.session_file();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Signed-in user for this database, if any.
pub fn session_user(conn: &Connection, cfg: &Config) -> AppResult<Option<User>> {
    match load_session_token(cfg) {
        Some(token) => current_user(conn, &token),
        None => Ok(None),
    }
}

/// Signed-in user or `Unauthorized`.
pub fn require_user(conn: &Connection, cfg: &Config) -> AppResult<User> {
    session_user(conn, cfg)?.ok_or(AppError::Unauthorized)
}
