use predicates::str::contains;
use std::fs;

mod common;
use common::setup_signed_in;

fn seed(home: &common::TestHome) {
    home.bgt()
        .args(["income", "add", "--amount", "1000", "--source", "salary", "--frequency", "per-month", "--name", "Job"])
        .assert()
        .success();
    home.bgt()
        .args(["expense", "add", "--amount", "75.5", "--category", "2", "--description", "Taxi, late night"])
        .assert()
        .success();
    home.bgt()
        .args(["savings", "add", "--name", "Trip", "--type", "vacation", "--bank", "BPI", "--goal", "2000"])
        .assert()
        .success();
}

#[test]
fn test_export_income_csv() {
    let home = setup_signed_in();
    seed(&home);
    let out = home.file("income.csv");

    home.bgt()
        .args(["export", "--what", "income", "--format", "csv", "--file", &out.to_string_lossy()])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("csv written");
    let mut lines = content.lines();
    let header = lines.next().expect("header");
    assert!(header.contains("income_name"));
    assert!(header.contains("frequency"));
    let row = lines.next().expect("row");
    assert!(row.contains("Job"));
    assert!(row.contains("per-month"));
    assert!(lines.next().is_none());
}

#[test]
fn test_export_expenses_json_quotes_survive() {
    let home = setup_signed_in();
    seed(&home);
    let out = home.file("expenses.json");

    home.bgt()
        .args(["export", "--what", "expenses", "--format", "json", "--file", &out.to_string_lossy()])
        .assert()
        .success();

    let rows: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("json written")).expect("valid json");
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["description"], "Taxi, late night");
    assert_eq!(rows[0]["amount"], 75.5);
}

#[test]
fn test_export_range_outside_data_writes_nothing() {
    let home = setup_signed_in();
    seed(&home);
    let out = home.file("old.csv");

    home.bgt()
        .args([
            "export", "--what", "savings", "--file", &out.to_string_lossy(), "--range", "1999-01:1999-12",
        ])
        .assert()
        .success()
        .stdout(contains("Nothing to export"));

    assert!(!out.exists());
}

#[test]
fn test_export_rejects_bad_range() {
    let home = setup_signed_in();
    let out = home.file("bad.csv");

    home.bgt()
        .args(["export", "--what", "income", "--file", &out.to_string_lossy(), "--range", "2025-99"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_export_existing_file_needs_force() {
    let home = setup_signed_in();
    seed(&home);
    let out = home.file("income.json");
    fs::write(&out, "keep me").expect("pre-existing file");

    // Declining the prompt keeps the file.
    home.bgt()
        .args(["export", "--what", "income", "--format", "json", "--file", &out.to_string_lossy()])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("Export cancelled"));
    assert_eq!(fs::read_to_string(&out).expect("read"), "keep me");

    home.bgt()
        .args(["export", "--what", "income", "--format", "json", "--file", &out.to_string_lossy(), "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&out).expect("read").contains("Job"));
}

#[test]
fn test_export_requires_sign_in() {
    let home = common::setup_home();
    let out = home.file("x.csv");

    home.bgt()
        .args(["export", "--what", "income", "--file", &out.to_string_lossy()])
        .assert()
        .failure()
        .stderr(contains("Unauthorized"));
}
