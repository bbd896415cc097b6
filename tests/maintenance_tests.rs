use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{setup_home, setup_signed_in};

#[test]
fn test_init_applies_all_migrations() {
    let home = setup_home();

    let applied: i64 = home
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
            [],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(applied, 5);

    home.bgt()
        .args(["db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("0 applied"));
}

#[test]
fn test_db_check_and_info() {
    let home = setup_signed_in();

    home.bgt()
        .args(["db", "--check", "--vacuum"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed").and(contains("Vacuum completed")));

    home.bgt().args(["db", "--info"]).assert().success();
}

#[test]
fn test_log_limit() {
    let home = setup_signed_in();

    home.bgt()
        .args(["log", "--print", "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("Internal log"));
}

#[test]
fn test_backup_plain_and_compressed() {
    let home = setup_home();
    let plain = home.file("backups/copy.sqlite");

    home.bgt()
        .args(["backup", "--file", &plain.to_string_lossy()])
        .assert()
        .success()
        .stdout(contains("Backup created"));
    assert!(plain.exists());

    let zipped = home.file("zipped.sqlite");
    home.bgt()
        .args(["backup", "--file", &zipped.to_string_lossy(), "--compress"])
        .assert()
        .success();
    assert!(home.file("zipped.zip").exists());
    assert!(!zipped.exists());
}

#[test]
fn test_config_print_shows_settings() {
    let home = setup_home();

    home.bgt()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("database:").and(contains("password_iterations: 1000")))
        .stdout(contains("income: database"));
}

#[test]
fn test_init_writes_config_file() {
    let home = setup_home();
    fs::remove_file(home.file("budgety.conf")).expect("remove config");

    home.bgt().args(["init"]).assert().success();

    let written = fs::read_to_string(home.file("budgety.conf")).expect("config written");
    assert!(written.contains("budgety.sqlite"));
    assert!(written.contains("session_ttl_days: 7"));
}

#[test]
fn test_corrupt_local_blob_is_reported() {
    let home = setup_signed_in();
    home.bgt()
        .args(["expense", "add", "--amount", "1", "--category", "1", "--description", "x"])
        .assert()
        .success();

    home.conn()
        .execute("UPDATE local_storage SET value = '{not json' WHERE key = 'expenses'", [])
        .expect("corrupt blob");

    home.bgt()
        .args(["expense", "list"])
        .assert()
        .failure()
        .stderr(contains("expenses"));
}

#[test]
fn test_out_of_range_lifetimes_are_rejected_on_load() {
    let home = setup_home();
    let conf = home.file("budgety.conf");
    let base = fs::read_to_string(&conf).expect("read config");

    fs::write(&conf, format!("{base}session_ttl_days: 200000000000\n")).expect("write config");
    home.bgt()
        .args(["config", "--print"])
        .assert()
        .failure()
        .stderr(contains("session_ttl_days must be between 1 and 3650"));

    fs::write(&conf, format!("{base}otp_ttl_minutes: -5\n")).expect("write config");
    home.bgt()
        .args(["auth", "otp", "--email", "juan@example.com"])
        .assert()
        .failure()
        .stderr(contains("otp_ttl_minutes must be between 1 and 1440"));
}
