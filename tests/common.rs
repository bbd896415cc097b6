#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated Budgety home: config file, database and session file live here.
pub struct TestHome {
    pub dir: TempDir,
    pub db_path: String,
}

impl TestHome {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// `budgety` bound to this home.
    pub fn bgt(&self) -> Command {
        let mut cmd = bgt();
        cmd.env("BUDGETY_HOME", self.dir.path());
        cmd
    }

    pub fn conn(&self) -> rusqlite::Connection {
        rusqlite::Connection::open(&self.db_path).expect("open db")
    }
}

pub fn bgt() -> Command {
    cargo_bin_cmd!("budgety")
}

/// Write a config with cheap password hashing plus any extra YAML, then init the DB.
pub fn setup_home_with(extra_yaml: &str) -> TestHome {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("budgety.sqlite").to_string_lossy().to_string();

    let config = format!(
        "database: {db_path}\npassword_iterations: 1000\ncurrency_symbol: \"$\"\n{extra_yaml}"
    );
    fs::write(dir.path().join("budgety.conf"), config).expect("write config");

    let home = TestHome { dir, db_path };
    home.bgt().args(["--test", "init"]).assert().success();
    home
}

pub fn setup_home() -> TestHome {
    setup_home_with("")
}

/// Latest code mailed to `email` for `purpose`, read straight from the database.
pub fn latest_code(home: &TestHome, email: &str, purpose: &str) -> String {
    home.conn()
        .query_row(
            "SELECT code FROM verifications WHERE email = ?1 AND purpose = ?2
             ORDER BY id DESC LIMIT 1",
            [email, purpose],
            |row| row.get(0),
        )
        .expect("verification code")
}

pub fn sign_up(home: &TestHome, name: &str, email: &str, password: &str) {
    home.bgt()
        .args([
            "auth",
            "signup",
            "--name",
            name,
            "--email",
            email,
            "--password",
            password,
            "--confirm",
            password,
        ])
        .assert()
        .success();
}

/// Sign up and verify, leaving the user signed in.
pub fn signed_in_user(home: &TestHome, email: &str) {
    sign_up(home, "Juan Dela Cruz", email, "s3cret-pass");
    let code = latest_code(home, email, "email-verification");
    home.bgt()
        .args(["auth", "verify", "--email", email, "--code", &code])
        .assert()
        .success();
}

pub fn setup_signed_in() -> TestHome {
    let home = setup_home();
    signed_in_user(&home, "juan@example.com");
    home
}

/// Run a `--json` command and parse its stdout.
pub fn json_of(home: &TestHome, args: &[&str]) -> serde_json::Value {
    let out = home.bgt().args(args).output().expect("run budgety");
    assert!(
        out.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("valid JSON on stdout")
}

/// Full id of the only/first record in a `--json` listing.
pub fn first_id(list: &serde_json::Value) -> String {
    list[0]["id"].as_str().expect("id").to_string()
}
