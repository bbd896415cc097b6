use budgety::config::Backend;
use budgety::db::local_storage;
use budgety::db::migrate::run_pending_migrations;
use budgety::db::pool::DbPool;
use budgety::errors::AppError;
use budgety::models::category::UserCategory;
use budgety::models::income::IncomeItem;
use budgety::models::frequency::Frequency;
use budgety::store;
use chrono::Utc;
use rusqlite::Connection;

fn add_user(conn: &Connection, id: &str) {
    conn.execute(
        "INSERT INTO users (id, name, email, email_verified, password_hash, password_salt,
                            password_iterations, image, created_at, updated_at)
         VALUES (?1, 'Test', ?1 || '@example.com', 1, 'h', 's', 1, NULL, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
        [id],
    )
    .expect("insert user");
}

fn item(id: &str, user: &str) -> IncomeItem {
    let now = Utc::now();
    IncomeItem {
        id: id.to_string(),
        amount: 100.0,
        source: "salary".to_string(),
        frequency: Frequency::PerMonth,
        income_name: format!("Income {id}"),
        created_at: now,
        updated_at: now,
        user_id: user.to_string(),
    }
}

#[test]
fn test_both_backends_share_the_contract() {
    for backend in [Backend::Local, Backend::Database] {
        let pool = DbPool::in_memory().expect("db");
        add_user(&pool.conn, "u1");
        let repo = store::open::<IncomeItem>(&pool.conn, backend, "u1");

        repo.insert(&item("abc123", "u1")).expect("insert");
        repo.insert(&item("abd456", "u1")).expect("insert");
        assert_eq!(repo.list().expect("list").len(), 2);

        let mut changed = item("abc123", "u1");
        changed.amount = 250.0;
        repo.update(&changed).expect("update");
        assert_eq!(repo.get("abc123").expect("get").amount, 250.0);

        assert_eq!(repo.resolve_id("abd").expect("prefix"), "abd456");
        assert!(matches!(repo.resolve_id("ab"), Err(AppError::AmbiguousId(_))));
        assert!(matches!(repo.resolve_id("zz"), Err(AppError::NotFound { .. })));

        let removed = repo.delete("abd456").expect("delete");
        assert_eq!(removed.id, "abd456");
        assert!(matches!(repo.delete("abd456"), Err(AppError::NotFound { .. })));
        assert!(matches!(
            repo.update(&item("missing", "u1")),
            Err(AppError::NotFound { .. })
        ));
    }
}

#[test]
fn test_records_are_scoped_per_user() {
    for backend in [Backend::Local, Backend::Database] {
        let pool = DbPool::in_memory().expect("db");
        add_user(&pool.conn, "u1");
        add_user(&pool.conn, "u2");

        store::open::<IncomeItem>(&pool.conn, backend, "u1")
            .insert(&item("x1", "u1"))
            .expect("insert");

        let other = store::open::<IncomeItem>(&pool.conn, backend, "u2");
        assert!(other.list().expect("list").is_empty());
        assert!(other.get("x1").is_err());
    }
}

#[test]
fn test_legacy_name_field_is_migrated() {
    let conn = Connection::open_in_memory().expect("db");
    run_pending_migrations(&conn).expect("migrate");

    let legacy = r#"[{"id":"old1","amount":50.0,"source":"other","frequency":"per-week",
        "name":"Tips","createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z",
        "userId":"u1"}]"#;
    local_storage::set_item(&conn, "u1", "income", legacy).expect("seed blob");

    // Pretend the rename never ran.
    conn.execute(
        "DELETE FROM log WHERE target = '20251115_0003_income_name_field'",
        [],
    )
    .expect("forget migration");
    assert_eq!(run_pending_migrations(&conn).expect("migrate again"), 1);

    let raw = local_storage::get_item(&conn, "u1", "income")
        .expect("read")
        .expect("blob");
    assert!(raw.contains("\"income_name\":\"Tips\""));
    assert!(!raw.contains("\"name\""));

    let items = store::open::<IncomeItem>(&conn, Backend::Local, "u1")
        .list()
        .expect("list");
    assert_eq!(items[0].income_name, "Tips");
}

#[test]
fn test_categories_without_ids_get_one() {
    let conn = Connection::open_in_memory().expect("db");
    run_pending_migrations(&conn).expect("migrate");

    local_storage::set_item(
        &conn,
        "u1",
        "selectedCategory",
        r#"[{"categoryId":2,"categoryName":"Commute"}]"#,
    )
    .expect("seed blob");
    conn.execute(
        "DELETE FROM log WHERE target = '20251122_0004_category_ids'",
        [],
    )
    .expect("forget migration");
    run_pending_migrations(&conn).expect("migrate again");

    let first = store::open::<UserCategory>(&conn, Backend::Local, "u1")
        .list()
        .expect("list");
    let second = store::open::<UserCategory>(&conn, Backend::Local, "u1")
        .list()
        .expect("list");
    assert_eq!(first[0].category_name, "Commute");
    // The id is stored, not regenerated on every read.
    assert_eq!(first[0].id, second[0].id);
}

#[test]
fn test_corrupt_blob_is_an_error() {
    let pool = DbPool::in_memory().expect("db");
    local_storage::set_item(&pool.conn, "u1", "income", "{oops").expect("seed");

    let result = store::open::<IncomeItem>(&pool.conn, Backend::Local, "u1").list();
    assert!(matches!(result, Err(AppError::Storage { .. })));
}

/// Re-run the income migrations over a seeded blob and list the result.
fn migrate_income_blob(conn: &Connection, blob: &str) -> Vec<IncomeItem> {
    local_storage::set_item(conn, "u1", "income", blob).expect("seed blob");
    conn.execute(
        "DELETE FROM log WHERE target IN
            ('20251115_0003_income_name_field', '20251129_0005_income_required_fields')",
        [],
    )
    .expect("forget migrations");
    assert_eq!(run_pending_migrations(conn).expect("migrate again"), 2);

    store::open::<IncomeItem>(conn, Backend::Local, "u1")
        .list()
        .expect("list")
}

#[test]
fn test_quick_add_income_list_loads_after_migration() {
    let conn = Connection::open_in_memory().expect("db");
    run_pending_migrations(&conn).expect("migrate");

    let items = migrate_income_blob(
        &conn,
        r#"[{"amount":40000,"source":"salary","frequency":"per-month"},
            {"amount":500,"source":"freelance","frequency":"per-week"}]"#,
    );

    assert_eq!(items.len(), 2);
    let salary = items.iter().find(|i| i.source == "salary").expect("salary");
    assert_eq!(salary.amount, 40000.0);
    assert_eq!(salary.income_name, "Salary");
    assert_eq!(salary.user_id, "u1");
    assert!(!salary.id.is_empty());
    assert_ne!(items[0].id, items[1].id);

    // Ids are stored once, so later reads agree.
    let again = store::open::<IncomeItem>(&conn, Backend::Local, "u1")
        .list()
        .expect("list");
    assert_eq!(
        items.iter().map(|i| i.id.clone()).collect::<Vec<_>>(),
        again.iter().map(|i| i.id.clone()).collect::<Vec<_>>()
    );
}

#[test]
fn test_income_with_both_name_fields_keeps_income_name() {
    let conn = Connection::open_in_memory().expect("db");
    run_pending_migrations(&conn).expect("migrate");

    let items = migrate_income_blob(
        &conn,
        r#"[{"id":"dup1","amount":75.0,"source":"other","frequency":"per-year",
            "name":"Old","income_name":"Current","createdAt":"2024-05-01T10:00:00Z",
            "updatedAt":"2024-05-01T10:00:00Z","userId":"u1"}]"#,
    );

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "dup1");
    assert_eq!(items[0].income_name, "Current");

    let raw = local_storage::get_item(&conn, "u1", "income")
        .expect("read")
        .expect("blob");
    assert!(!raw.contains("\"name\""));
}
