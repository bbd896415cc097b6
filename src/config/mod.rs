use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where a record type is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON array per user in the `local_storage` table.
    Local,
    /// One relational table per record type.
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_backend")]
    pub income: Backend,
    #[serde(default = "default_local_backend")]
    pub expenses: Backend,
    #[serde(default = "default_local_backend")]
    pub savings: Backend,
    #[serde(default = "default_local_backend")]
    pub categories: Backend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            income: default_database_backend(),
            expenses: default_local_backend(),
            savings: default_local_backend(),
            categories: default_local_backend(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
    #[serde(default = "default_otp_ttl_minutes")]
    pub otp_ttl_minutes: i64,
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
    #[serde(default)]
    pub storage: StorageConfig,
}

const MAX_SESSION_TTL_DAYS: i64 = 3650;
const MAX_OTP_TTL_MINUTES: i64 = 1440;

fn default_database_backend() -> Backend {
    Backend::Database
}
fn default_local_backend() -> Backend {
    Backend::Local
}
fn default_currency_symbol() -> String {
    "₱".to_string()
}
fn default_session_ttl_days() -> i64 {
    7
}
fn default_otp_ttl_minutes() -> i64 {
    10
}
fn default_mail_from() -> String {
    "Budgety <noreply@budgety.local>".to_string()
}
fn default_password_iterations() -> u32 {
    100_000
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            currency_symbol: default_currency_symbol(),
            session_ttl_days: default_session_ttl_days(),
            otp_ttl_minutes: default_otp_ttl_minutes(),
            mail_from: default_mail_from(),
            password_iterations: default_password_iterations(),
            storage: StorageConfig::default(),
        }
    }

    /// Return the standard configuration directory depending on the platform.
    /// `BUDGETY_HOME` overrides it.
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var("BUDGETY_HOME") {
            return PathBuf::from(custom);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("budgety")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".budgety")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("budgety.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("budgety.sqlite")
    }

    /// File holding the current session token, next to the database.
    pub fn session_file(&self) -> PathBuf {
        let mut p = PathBuf::from(&self.database).into_os_string();
        p.push(".session");
        PathBuf::from(p)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.validate()
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(cfg)
    }

    /// Lifetimes must be positive and small enough for date arithmetic.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&self.session_ttl_days) {
            return Err(format!(
                "session_ttl_days must be between 1 and {MAX_SESSION_TTL_DAYS}, got {}",
                self.session_ttl_days
            ));
        }
        if !(1..=MAX_OTP_TTL_MINUTES).contains(&self.otp_ttl_minutes) {
            return Err(format!(
                "otp_ttl_minutes must be between 1 and {MAX_OTP_TTL_MINUTES}, got {}",
                self.otp_ttl_minutes
            ));
        }
        if self.password_iterations == 0 {
            return Err("password_iterations must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files.
    /// Returns the configuration that was (or, in test mode, would have been) written.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Self::with_database(db_path.clone());

        if !is_test {
            fs::create_dir_all(&dir)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(config.to_yaml()?.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
