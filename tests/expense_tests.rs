use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TestHome, first_id, json_of, setup_signed_in};

fn add_expense(home: &TestHome, amount: &str, category: &str, description: &str) {
    home.bgt()
        .args([
            "expense",
            "add",
            "--amount",
            amount,
            "--category",
            category,
            "--description",
            description,
        ])
        .assert()
        .success();
}

#[test]
fn test_add_expense_uses_catalog_name() {
    let home = setup_signed_in();
    add_expense(&home, "250", "1", "Lunch");

    let list = json_of(&home, &["expense", "list", "--json"]);
    assert_eq!(list[0]["categoryId"], 1);
    assert_eq!(list[0]["categoryName"], "Food");
    assert_eq!(list[0]["description"], "Lunch");
}

#[test]
fn test_add_expense_prefers_own_category_name() {
    let home = setup_signed_in();
    home.bgt()
        .args(["category", "add", "--catalog", "1", "--name", "Groceries"])
        .assert()
        .success();

    add_expense(&home, "900", "1", "Weekly market");

    let list = json_of(&home, &["expense", "list", "--json"]);
    assert_eq!(list[0]["categoryName"], "Groceries");
}

#[test]
fn test_expense_validation() {
    let home = setup_signed_in();

    home.bgt()
        .args(["expense", "add", "--amount=-3", "--category", "9", "--description", " "])
        .assert()
        .failure()
        .stderr(
            contains("Amount must be greater than 0")
                .and(contains("Please select a category"))
                .and(contains("Description is required")),
        );
}

#[test]
fn test_list_empty_expenses() {
    let home = setup_signed_in();

    home.bgt()
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(contains("No expenses found"));
}

#[test]
fn test_search_and_category_filter() {
    let home = setup_signed_in();
    add_expense(&home, "120", "1", "Coffee beans");
    add_expense(&home, "45", "2", "Jeepney fare");
    add_expense(&home, "1800", "4", "Electricity");

    let by_text = json_of(&home, &["expense", "list", "--search", "COFFEE", "--json"]);
    assert_eq!(by_text.as_array().map(Vec::len), Some(1));

    // Category names are searched too.
    let by_category_name = json_of(&home, &["expense", "list", "--search", "transport", "--json"]);
    assert_eq!(by_category_name[0]["description"], "Jeepney fare");

    let by_id = json_of(&home, &["expense", "list", "--category", "4", "--json"]);
    assert_eq!(by_id.as_array().map(Vec::len), Some(1));
    assert_eq!(by_id[0]["amount"], 1800.0);

    home.bgt()
        .args(["expense", "list", "--search", "nothing-like-this"])
        .assert()
        .success()
        .stdout(contains("No expenses match the filter."));
}

#[test]
fn test_edit_expense_changes_only_given_fields() {
    let home = setup_signed_in();
    add_expense(&home, "120", "1", "Coffee");
    let id = first_id(&json_of(&home, &["expense", "list", "--json"]));

    home.bgt()
        .args(["expense", "edit", &id[..6], "--category", "3", "--notes", "with friends"])
        .assert()
        .success();

    let list = json_of(&home, &["expense", "list", "--json"]);
    assert_eq!(list[0]["amount"], 120.0);
    assert_eq!(list[0]["description"], "Coffee");
    assert_eq!(list[0]["categoryId"], 3);
    assert_eq!(list[0]["categoryName"], "Entertainment");
    assert_eq!(list[0]["notes"], "with friends");
}

#[test]
fn test_delete_expense() {
    let home = setup_signed_in();
    add_expense(&home, "120", "1", "Coffee");
    let id = first_id(&json_of(&home, &["expense", "list", "--json"]));

    home.bgt()
        .args(["expense", "del", &id, "-y"])
        .assert()
        .success()
        .stdout(contains("Expense deleted"));

    home.bgt()
        .args(["expense", "show", &id])
        .assert()
        .failure()
        .stderr(contains("Expense not found"));
}

#[test]
fn test_breakdown_ranks_categories() {
    let home = setup_signed_in();
    add_expense(&home, "150", "1", "Groceries");
    add_expense(&home, "100", "1", "Snacks");
    add_expense(&home, "500", "4", "Rent share");

    let rows = json_of(&home, &["expense", "breakdown", "--json"]);
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 6);

    assert_eq!(rows[0]["category"]["name"], "Bills");
    assert_eq!(rows[0]["percentage"], 50.0);
    assert_eq!(rows[1]["category"]["name"], "Food");
    assert_eq!(rows[1]["transaction_count"], 2);
    assert_eq!(rows[1]["average_amount"], 125.0);
    assert_eq!(rows[5]["total_amount"], 0.0);

    home.bgt()
        .args(["expense", "breakdown"])
        .assert()
        .success()
        .stdout(contains("2 of 6 categories used"))
        .stdout(contains("High spending"));
}
