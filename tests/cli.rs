use assert_cmd::Command;
use chrono::{Duration, Local};
use predicates::prelude::*;
use tempfile::TempDir;

fn ledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lifeledger").unwrap();
    cmd.env("LIFELEDGER_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    ledger(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    dir
}

#[test]
fn init_creates_default_account_and_categories() {
    let dir = initialized();

    ledger(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Main").and(predicate::str::contains("USD")));

    ledger(&dir)
        .args(["category", "list", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary").and(predicate::str::contains("Groceries").not()));
}

#[test]
fn expense_report_shows_totals_and_exports_csv() {
    let dir = initialized();

    ledger(&dir)
        .args([
            "txn", "add", "Market", "50.00", "--category", "Groceries", "--account", "Main",
            "--date", "2025-03-03 10:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded expense: Market USD 50.00"));

    let csv_path = dir.path().join("march.csv");
    ledger(&dir)
        .args(["report", "expense", "--period", "month", "--anchor", "2025-03-10", "--export"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Expense Report: Month")
                .and(predicate::str::contains("Groceries"))
                .and(predicate::str::contains("50.00")),
        );

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("date,USD,transactions"));
    assert!(csv.contains("2025-03-03,50.00,1"));
    assert_eq!(csv.lines().count(), 32);

    // one month earlier there is nothing
    ledger(&dir)
        .args(["report", "expense", "--period", "month", "--anchor", "2025-03-10", "--shift", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions in this period."));
}

#[test]
fn report_rejects_unknown_period() {
    let dir = initialized();
    ledger(&dir)
        .args(["report", "income", "--period", "fortnight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid period"));
}

#[test]
fn quick_income_needs_income_category() {
    let dir = initialized();

    ledger(&dir)
        .args(["income", "add", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Choose an income category"));

    ledger(&dir)
        .args(["income", "add", "100", "--category", "Groceries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not an income category"));

    ledger(&dir)
        .args(["income", "add", "250.00", "--category", "Salary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Main balance: 250.00"));

    ledger(&dir)
        .args(["txn", "list", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"));
}

#[test]
fn recurring_income_summary() {
    let dir = initialized();

    ledger(&dir)
        .args([
            "income", "add-recurring", "Paycheck", "100.00", "--frequency", "weekly", "--start",
            "2025-01-06",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved recurring income: Paycheck"));

    ledger(&dir)
        .args(["income", "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("433.00 / month"));
}

#[test]
fn bill_reminders_follow_notification_profiles() {
    let dir = initialized();
    let due = (Local::now().date_naive() + Duration::days(10))
        .format("%Y-%m-%d")
        .to_string();

    ledger(&dir)
        .args(["bill", "add", "Internet", "60.00", "--due", &due])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminders scheduled: 1"));

    ledger(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("[standard]").and(predicate::str::contains("Internet")));

    ledger(&dir)
        .args(["bill", "notify", "Internet", "--template", "early", "--type", "alarm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("template early"));

    ledger(&dir)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("[early]").and(predicate::str::contains("[alarm]")));

    ledger(&dir)
        .args(["bill", "notify", "Internet", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uses the default notification profile"));

    ledger(&dir)
        .args(["bill", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All bills use the default notification profile."));
}

#[test]
fn paying_a_bill_records_an_expense() {
    let dir = initialized();

    ledger(&dir)
        .args(["bill", "add", "Rent", "800.00", "--due", "2025-03-01", "--repeat", "monthly"])
        .assert()
        .success();

    ledger(&dir)
        .args(["bill", "paid", "Rent", "--date", "2025-02-28"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next due: 2025-04-01"));

    ledger(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-800.00"));
}

#[test]
fn passcode_roundtrip() {
    let dir = initialized();

    ledger(&dir)
        .args(["security", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Passcode:       not set"));

    ledger(&dir)
        .args(["security", "set-passcode", "--passcode", "12ab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passcode must be 4 to 8 digits"));

    ledger(&dir)
        .args(["security", "set-passcode", "--passcode", "2468"])
        .assert()
        .success();

    ledger(&dir)
        .args(["security", "verify", "--passcode", "2468"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Passcode is correct."));

    ledger(&dir)
        .args(["security", "verify", "--passcode", "1357"])
        .assert()
        .failure();

    ledger(&dir)
        .args(["security", "reset", "--yes"])
        .assert()
        .success();

    ledger(&dir)
        .args(["security", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Passcode:       not set"));

    // the hash, never the passcode, is on disk
    let stored = std::fs::read_to_string(dir.path().join("security.json")).unwrap();
    assert!(!stored.contains("2468"));
}
