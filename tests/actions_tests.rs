use budgety::actions::ActionContext;
use budgety::actions::expenses::get_expenses;
use budgety::actions::income::{delete_income, edit_income, get_income, submit_new_income};
use budgety::actions::user::get_user_info;
use budgety::config::Config;
use budgety::core::auth::{Auth, save_session_token};
use budgety::core::email::{EmailMessage, Mailer};
use budgety::core::income::IncomeManager;
use budgety::core::validation::{IncomeForm, SignUpForm};
use budgety::db::pool::DbPool;
use budgety::errors::{AppError, AppResult};
use budgety::models::user::OtpPurpose;
use std::cell::RefCell;
use tempfile::TempDir;

/// Keeps messages in memory instead of the outbox table.
#[derive(Default)]
struct RecordingMailer {
    sent: RefCell<Vec<EmailMessage>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}

fn setup() -> (TempDir, Config, DbPool) {
    let dir = TempDir::new().expect("tempdir");
    let mut cfg = Config::default();
    cfg.database = dir.path().join("actions.sqlite").to_string_lossy().to_string();
    cfg.password_iterations = 1000;
    let pool = DbPool::new(&cfg.database).expect("db");
    (dir, cfg, pool)
}

/// Create a verified user through the emailed code and store its session.
fn sign_in(cfg: &Config, pool: &DbPool, email: &str) {
    let mailer = RecordingMailer::default();
    let auth = Auth::new(&pool.conn, cfg, &mailer);
    auth.sign_up(&SignUpForm {
        full_name: "Test User".into(),
        email: email.into(),
        password: "password123".into(),
        confirm_password: "password123".into(),
    })
    .expect("sign up");

    let mail = mailer.sent.borrow()[0].clone();
    assert_eq!(mail.subject, "Your Email Verification Code - Budgety");
    let code = mail
        .text
        .lines()
        .find_map(|l| l.strip_prefix("Your code: "))
        .expect("code line")
        .to_string();

    let (_, session) = auth.verify_email(email, &code).expect("verify");
    save_session_token(cfg, &session.token).expect("save session");
}

fn form(amount: &str, name: &str) -> IncomeForm {
    IncomeForm {
        amount: amount.into(),
        source: "salary".into(),
        frequency: "per-month".into(),
        income_name: name.into(),
    }
}

#[test]
fn test_actions_answer_unauthorized_without_session() {
    let (_dir, cfg, pool) = setup();
    let ctx = ActionContext::new(&pool.conn, &cfg);

    let res = get_income(&ctx);
    assert_eq!(res.error.as_deref(), Some("Unauthorized"));
    assert_eq!(res.message, "Unauthorized");
    assert!(res.data.is_none());

    assert!(get_expenses(&ctx).is_unauthorized());
    assert!(get_user_info(&ctx).is_unauthorized());
    assert!(submit_new_income(&ctx, &form("10", "x")).is_unauthorized());
    assert!(matches!(
        get_income(&ctx).into_result(),
        Err(AppError::Unauthorized)
    ));
}

#[test]
fn test_submit_rejects_non_positive_amount() {
    let (_dir, cfg, pool) = setup();
    sign_in(&cfg, &pool, "a@example.com");
    let ctx = ActionContext::new(&pool.conn, &cfg);

    let res = submit_new_income(&ctx, &form("-1", "Job"));
    assert_eq!(res.message, "Failed to submit new income");
    assert!(res.issues.as_ref().and_then(|i| i.message_for("amount")).is_some());

    assert_eq!(get_income(&ctx).data.map(|d| d.len()), Some(0));
}

#[test]
fn test_income_action_messages() {
    let (_dir, cfg, pool) = setup();
    sign_in(&cfg, &pool, "a@example.com");
    let ctx = ActionContext::new(&pool.conn, &cfg);

    let added = submit_new_income(&ctx, &form("100", "Job"));
    assert_eq!(added.message, "New income submitted successfully");
    let id = added.data.expect("item").id;

    assert_eq!(edit_income(&ctx, &form("100", "Job"), " ").message, "Income ID is required");
    assert_eq!(edit_income(&ctx, &form("0", "Job"), &id).message, "Invalid data");
    assert_eq!(
        edit_income(&ctx, &form("150", "Job"), "missing").message,
        "Failed to update income"
    );

    let edited = edit_income(&ctx, &form("150", "Better job"), &id);
    assert_eq!(edited.message, "Income updated successfully");
    assert_eq!(edited.data.expect("item").amount, 150.0);

    assert_eq!(delete_income(&ctx, "missing").message, "Failed to delete income");
    assert_eq!(delete_income(&ctx, &id).message, "Income deleted successfully");
}

#[test]
fn test_get_expenses_empty_and_user_info() {
    let (_dir, cfg, pool) = setup();
    sign_in(&cfg, &pool, "a@example.com");
    let ctx = ActionContext::new(&pool.conn, &cfg);

    let res = get_expenses(&ctx);
    assert!(res.is_ok());
    assert_eq!(res.message, "No expenses found");
    assert_eq!(res.data, Some(Vec::new()));

    submit_new_income(&ctx, &form("100", "Job"));
    let info = get_user_info(&ctx).data.expect("info");
    assert_eq!(info.user.email, "a@example.com");
    assert!(info.user.email_verified);
    assert_eq!(info.incomes.len(), 1);
}

#[test]
fn test_failed_optimistic_delete_rolls_back() {
    let (_dir, cfg, pool) = setup();
    sign_in(&cfg, &pool, "a@example.com");
    let ctx = ActionContext::new(&pool.conn, &cfg);
    submit_new_income(&ctx, &form("100", "Job"));

    let mut manager = IncomeManager::load(ctx).expect("load");
    let before = manager.items();

    let settled = manager.delete("no-such-id").expect("settled");
    assert!(!settled.response.is_ok());
    assert_eq!(settled.view, before);
    assert_eq!(manager.items(), before);
}

#[test]
fn test_optimistic_add_confirms_with_stored_record() {
    let (_dir, cfg, pool) = setup();
    sign_in(&cfg, &pool, "a@example.com");
    let ctx = ActionContext::new(&pool.conn, &cfg);

    let mut manager = IncomeManager::load(ctx).expect("load");
    let settled = manager.add(&form("75", "Tutoring")).expect("settled");

    assert!(settled.response.is_ok());
    assert_eq!(settled.view.len(), 1);
    // The provisional id is replaced by the stored one.
    assert!(!settled.view[0].id.starts_with("pending-"));
    assert_eq!(settled.view[0].income_name, "Tutoring");
}

#[test]
fn test_unrepresentable_lifetimes_are_errors() {
    let (_dir, cfg, pool) = setup();
    sign_in(&cfg, &pool, "a@example.com");
    let mailer = RecordingMailer::default();

    let mut long_session = cfg.clone();
    long_session.session_ttl_days = 200_000_000_000;
    let auth = Auth::new(&pool.conn, &long_session, &mailer);
    assert!(matches!(auth.create_session("u1"), Err(AppError::Config(_))));

    let mut expired_codes = cfg.clone();
    expired_codes.otp_ttl_minutes = -5;
    let auth = Auth::new(&pool.conn, &expired_codes, &mailer);
    assert!(matches!(
        auth.send_otp("a@example.com", OtpPurpose::SignIn),
        Err(AppError::Config(_))
    ));
    assert!(mailer.sent.borrow().is_empty());

    let issued: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM verifications WHERE purpose = ?1",
            [OtpPurpose::SignIn.as_str()],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(issued, 0);
}
