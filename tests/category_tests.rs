use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{bgt, setup_home, setup_signed_in};

fn own_categories(home: &common::TestHome) -> Vec<(String, u32, String)> {
    let conn = home.conn();
    let raw: String = conn
        .query_row(
            "SELECT value FROM local_storage WHERE key = 'selectedCategory'",
            [],
            |row| row.get(0),
        )
        .unwrap_or_else(|_| "[]".to_string());
    let list: serde_json::Value = serde_json::from_str(&raw).expect("category blob");
    list.as_array()
        .expect("array")
        .iter()
        .map(|c| {
            (
                c["id"].as_str().unwrap_or_default().to_string(),
                c["categoryId"].as_u64().unwrap_or_default() as u32,
                c["categoryName"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

#[test]
fn test_catalog_needs_no_account() {
    let home = setup_home();

    home.bgt()
        .args(["category", "catalog"])
        .assert()
        .success()
        .stdout(contains("Food").and(contains("Transportation")).and(contains("Other")));
}

#[test]
fn test_category_commands_need_sign_in() {
    let home = setup_home();

    home.bgt()
        .args(["category", "list"])
        .assert()
        .failure()
        .stderr(contains("Unauthorized"));
}

#[test]
fn test_add_category_defaults_to_catalog_name() {
    let home = setup_signed_in();

    home.bgt()
        .args(["category", "add", "--catalog", "2"])
        .assert()
        .success()
        .stdout(contains("Category added: Transportation"));

    let cats = own_categories(&home);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].1, 2);
    assert_eq!(cats[0].2, "Transportation");
}

#[test]
fn test_add_category_rejects_unknown_catalog_id() {
    let home = setup_signed_in();

    home.bgt()
        .args(["category", "add", "--catalog", "42", "--name", "Pets"])
        .assert()
        .failure()
        .stderr(contains("Please select a category"));
}

#[test]
fn test_edit_and_delete_category() {
    let home = setup_signed_in();
    home.bgt()
        .args(["category", "add", "--catalog", "3", "--name", "Movies"])
        .assert()
        .success();
    let id = own_categories(&home)[0].0.clone();

    home.bgt()
        .args(["category", "edit", &id[..8], "--name", "Cinema"])
        .assert()
        .success();
    assert_eq!(own_categories(&home)[0].2, "Cinema");
    assert_eq!(own_categories(&home)[0].1, 3);

    home.bgt()
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(contains("Cinema"));

    home.bgt()
        .args(["category", "del", &id, "--yes"])
        .assert()
        .success();
    assert!(own_categories(&home).is_empty());
}

#[test]
fn test_help_lists_subcommands() {
    bgt()
        .args(["category", "--help"])
        .assert()
        .success()
        .stdout(contains("catalog").and(contains("add")));
}
