use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{latest_code, setup_home, sign_up, signed_in_user};

#[test]
fn test_signup_queues_verification_mail() {
    let home = setup_home();
    sign_up(&home, "Ana Santos", "Ana@Example.com", "s3cret-pass");

    home.bgt()
        .args(["auth", "outbox", "--email", "ana@example.com"])
        .assert()
        .success()
        .stdout(contains("Your Email Verification Code - Budgety"))
        .stdout(contains("This code will expire in 10 minutes."));

    let code = latest_code(&home, "ana@example.com", "email-verification");
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_signup_rejects_mismatched_passwords() {
    let home = setup_home();

    home.bgt()
        .args([
            "auth",
            "signup",
            "--name",
            "Ana",
            "--email",
            "ana@example.com",
            "--password",
            "s3cret-pass",
            "--confirm",
            "other-pass",
        ])
        .assert()
        .failure()
        .stderr(contains("Passwords do not match"));
}

#[test]
fn test_duplicate_signup_fails() {
    let home = setup_home();
    sign_up(&home, "Ana", "ana@example.com", "s3cret-pass");

    home.bgt()
        .args([
            "auth",
            "signup",
            "--name",
            "Ana Again",
            "--email",
            "ANA@example.com",
            "--password",
            "s3cret-pass",
            "--confirm",
            "s3cret-pass",
        ])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn test_login_requires_verified_email() {
    let home = setup_home();
    sign_up(&home, "Ana", "ana@example.com", "s3cret-pass");

    home.bgt()
        .args(["auth", "login", "--email", "ana@example.com", "--password", "s3cret-pass"])
        .assert()
        .failure()
        .stderr(contains("Email not verified"));
}

#[test]
fn test_verify_signs_in_and_sends_welcome() {
    let home = setup_home();
    signed_in_user(&home, "ana@example.com");

    home.bgt()
        .args(["auth", "whoami"])
        .assert()
        .success()
        .stdout(contains("ana@example.com"))
        .stdout(contains("Verified  : yes"));

    home.bgt()
        .args(["auth", "outbox", "--email", "ana@example.com"])
        .assert()
        .success()
        .stdout(contains("Welcome to Budgety"));
}

#[test]
fn test_wrong_code_three_times_invalidates_it() {
    let home = setup_home();
    sign_up(&home, "Ana", "ana@example.com", "s3cret-pass");
    let code = latest_code(&home, "ana@example.com", "email-verification");
    let wrong = if code == "000000" { "111111" } else { "000000" };

    for _ in 0..2 {
        home.bgt()
            .args(["auth", "verify", "--email", "ana@example.com", "--code", wrong])
            .assert()
            .failure()
            .stderr(contains("Invalid code"));
    }

    home.bgt()
        .args(["auth", "verify", "--email", "ana@example.com", "--code", wrong])
        .assert()
        .failure()
        .stderr(contains("Too many attempts"));

    // The right code no longer works either.
    home.bgt()
        .args(["auth", "verify", "--email", "ana@example.com", "--code", &code])
        .assert()
        .failure()
        .stderr(contains("Invalid or expired code"));
}

#[test]
fn test_resend_replaces_previous_code() {
    let home = setup_home();
    sign_up(&home, "Ana", "ana@example.com", "s3cret-pass");

    home.bgt()
        .args(["auth", "verify", "--email", "ana@example.com", "--resend"])
        .assert()
        .success();

    let count: i64 = home
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM verifications WHERE email = 'ana@example.com'",
            [],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(count, 1);
}

#[test]
fn test_login_logout_cycle() {
    let home = setup_home();
    signed_in_user(&home, "ana@example.com");

    home.bgt().args(["auth", "logout"]).assert().success();

    home.bgt()
        .args(["income", "list"])
        .assert()
        .failure()
        .stderr(contains("Unauthorized"));

    home.bgt()
        .args(["auth", "login", "--email", "ana@example.com", "--password", "wrong-pass"])
        .assert()
        .failure()
        .stderr(contains("Invalid email or password"));

    home.bgt()
        .args(["auth", "login", "--email", "ana@example.com", "--password", "s3cret-pass"])
        .assert()
        .success()
        .stdout(contains("Signed in as"));

    home.bgt().args(["income", "list"]).assert().success();
}

#[test]
fn test_otp_sign_in() {
    let home = setup_home();
    sign_up(&home, "Ana", "ana@example.com", "s3cret-pass");

    home.bgt()
        .args(["auth", "otp", "--email", "ana@example.com"])
        .assert()
        .success()
        .stdout(contains("Sign-in code sent"));

    let code = latest_code(&home, "ana@example.com", "sign-in");
    home.bgt()
        .args(["auth", "otp", "--email", "ana@example.com", "--code", &code])
        .assert()
        .success()
        .stdout(contains("Signed in as Ana"));

    // Receiving the code proved the address.
    home.bgt()
        .args(["auth", "whoami"])
        .assert()
        .success()
        .stdout(contains("Verified  : yes"));
}

#[test]
fn test_otp_for_unknown_email_fails() {
    let home = setup_home();

    home.bgt()
        .args(["auth", "otp", "--email", "ghost@example.com"])
        .assert()
        .failure()
        .stderr(contains("No account found"));
}

#[test]
fn test_reset_password_revokes_sessions() {
    let home = setup_home();
    signed_in_user(&home, "ana@example.com");

    home.bgt()
        .args(["auth", "forgot-password", "--email", "ana@example.com"])
        .assert()
        .success();
    let code = latest_code(&home, "ana@example.com", "forget-password");

    home.bgt()
        .args([
            "auth",
            "reset-password",
            "--email",
            "ana@example.com",
            "--code",
            &code,
            "--password",
            "brand-new-pass",
        ])
        .assert()
        .success();

    home.bgt()
        .args(["auth", "whoami"])
        .assert()
        .failure()
        .stderr(contains("Unauthorized"));

    home.bgt()
        .args(["auth", "login", "--email", "ana@example.com", "--password", "s3cret-pass"])
        .assert()
        .failure();

    home.bgt()
        .args(["auth", "login", "--email", "ana@example.com", "--password", "brand-new-pass"])
        .assert()
        .success();
}

#[test]
fn test_passwords_are_not_stored_in_clear() {
    let home = setup_home();
    sign_up(&home, "Ana", "ana@example.com", "s3cret-pass");

    let (hash, salt): (String, String) = home
        .conn()
        .query_row(
            "SELECT password_hash, password_salt FROM users WHERE email = 'ana@example.com'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("user row");

    assert!(!hash.contains("s3cret-pass"));
    assert!(!salt.is_empty());
}

#[test]
fn test_whoami_json_counts_records() {
    let home = setup_home();
    signed_in_user(&home, "ana@example.com");

    home.bgt()
        .args(["income", "add", "--amount", "1000", "--source", "salary", "--frequency", "per-month"])
        .assert()
        .success();

    let info = common::json_of(&home, &["auth", "whoami", "--json"]);
    assert_eq!(info["email"], "ana@example.com");
    assert_eq!(info["emailVerified"], true);
    assert_eq!(info["incomes"].as_array().map(Vec::len), Some(1));
    assert_eq!(info["expenses"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_auth_events_are_logged() {
    let home = setup_home();
    signed_in_user(&home, "ana@example.com");

    home.bgt()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("signup").and(contains("verify")));
}
