use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{first_id, json_of, setup_home_with, setup_signed_in, signed_in_user};

fn add_income(home: &common::TestHome, amount: &str, source: &str, frequency: &str, name: &str) {
    home.bgt()
        .args([
            "income",
            "add",
            "--amount",
            amount,
            "--source",
            source,
            "--frequency",
            frequency,
            "--name",
            name,
        ])
        .assert()
        .success()
        .stdout(contains("New income submitted successfully"));
}

#[test]
fn test_add_and_list_income_with_totals() {
    let home = setup_signed_in();
    add_income(&home, "500", "freelance", "per-week", "Design gigs");
    add_income(&home, "30000", "salary", "per-month", "Day job");

    home.bgt()
        .args(["income", "list"])
        .assert()
        .success()
        .stdout(contains("Design gigs").and(contains("Day job")))
        // 500 * 52 / 12 + 30000
        .stdout(contains("Monthly total: $32,166.67"));
}

#[test]
fn test_income_list_is_newest_first() {
    let home = setup_signed_in();
    add_income(&home, "100", "other", "per-month", "First");
    add_income(&home, "200", "other", "per-month", "Second");

    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list[0]["income_name"], "Second");
    assert_eq!(list[1]["income_name"], "First");
    assert_eq!(list[0]["frequency"], "per-month");
}

#[test]
fn test_invalid_income_is_rejected_and_not_stored() {
    let home = setup_signed_in();

    home.bgt()
        .args(["income", "add", "--amount", "0", "--source", "salary", "--frequency", "per-month"])
        .assert()
        .failure()
        .stderr(contains("Amount must be greater than 0"));

    home.bgt()
        .args(["income", "add", "--amount", "10", "--source", "salary", "--frequency", "daily"])
        .assert()
        .failure()
        .stderr(contains("frequency"));

    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[test]
fn test_edit_income_by_id_prefix_keeps_other_fields() {
    let home = setup_signed_in();
    add_income(&home, "1200", "salary", "per-month", "Job");

    let id = first_id(&json_of(&home, &["income", "list", "--json"]));
    let prefix = &id[..8];

    home.bgt()
        .args(["income", "edit", prefix, "--amount", "1500"])
        .assert()
        .success()
        .stdout(contains("Income updated successfully"));

    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["amount"], 1500.0);
    assert_eq!(list[0]["income_name"], "Job");
    assert_eq!(list[0]["source"], "salary");
}

#[test]
fn test_delete_income() {
    let home = setup_signed_in();
    add_income(&home, "1200", "salary", "per-month", "Job");
    let id = first_id(&json_of(&home, &["income", "list", "--json"]));

    home.bgt()
        .args(["income", "del", &id, "--yes"])
        .assert()
        .success()
        .stdout(contains("Income deleted successfully"));

    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[test]
fn test_delete_income_asks_first() {
    let home = setup_signed_in();
    add_income(&home, "1200", "salary", "per-month", "Job");
    let id = first_id(&json_of(&home, &["income", "list", "--json"]));

    home.bgt()
        .args(["income", "del", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Confirm [y/N]").and(contains("Operation cancelled.")));
    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    home.bgt()
        .args(["income", "del", &id])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Income deleted successfully"));
}

#[test]
fn test_delete_unknown_income_fails() {
    let home = setup_signed_in();

    home.bgt()
        .args(["income", "del", "does-not-exist", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Income not found"));
}

#[test]
fn test_quick_add_reports_rejected_entries() {
    let home = setup_signed_in();

    home.bgt()
        .args(["income", "quick-add", "1000:salary:monthly", "0:other:weekly", "250:investment:yearly:Dividends"])
        .assert()
        .failure()
        .stdout(contains("Added 2 of 3 entries"))
        .stdout(contains("Dividends"));

    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list.as_array().map(Vec::len), Some(2));
    // A missing name falls back to the source label.
    assert!(
        list.as_array()
            .unwrap()
            .iter()
            .any(|i| i["income_name"] == "Salary")
    );
}

#[test]
fn test_list_filters_by_frequency() {
    let home = setup_signed_in();
    add_income(&home, "100", "salary", "per-week", "Weekly");
    add_income(&home, "900", "salary", "per-year", "Bonus");

    let list = json_of(&home, &["income", "list", "--frequency", "yearly", "--json"]);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["income_name"], "Bonus");
}

#[test]
fn test_income_is_private_to_each_user() {
    let home = setup_signed_in();
    add_income(&home, "100", "salary", "per-month", "Mine");

    home.bgt().args(["auth", "logout"]).assert().success();
    signed_in_user(&home, "other@example.com");

    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[test]
fn test_income_in_local_storage_backend() {
    let home = setup_home_with("storage:\n  income: local\n");
    signed_in_user(&home, "juan@example.com");
    add_income(&home, "640", "business", "per-month", "Shop");

    let raw: String = home
        .conn()
        .query_row(
            "SELECT value FROM local_storage WHERE key = 'income'",
            [],
            |row| row.get(0),
        )
        .expect("income blob");
    assert!(raw.contains("\"income_name\":\"Shop\""));

    let list = json_of(&home, &["income", "list", "--json"]);
    assert_eq!(list[0]["income_name"], "Shop");
}
