use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;

mod common;

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("budgetbud_cli").expect("binary");
    cmd.env("BUDGETBUD_CLI_SCRIPT", "1")
        .env("BUDGETBUD_HOME", home)
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = common::data_dir();
    let input = "\
user alice
new-budget monthly 3 2000 --year 2024
add-item 1 savings 300
add-item 1 food 500
add-expense 1 food 120.5 --date 2024-03-04 --note groceries
budgets
show-budget 1
dashboard
exit
";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Budget created: Monthly Budget: March (2024-03-01 .. 2024-03-31)"))
        .stdout(contains("planned USD 800.00, savings USD 1200.00"))
        .stdout(contains("Savings:         USD 300.00 (15.0% of income)"))
        .stdout(contains("Total expenses: USD 120.50"));

    let book = std::fs::read_to_string(home.join("books/alice.json")).expect("book file");
    assert!(book.contains("\"total_expenses\": 800.0"));
    assert!(book.contains("\"savings\": 1200.0"));
    assert!(book.contains("\"notes\": \"groceries\""));
}

#[test]
fn active_user_survives_restarts() {
    let home = common::data_dir();
    cli(&home)
        .write_stdin("user bob\nnew-budget weekly 1 300 --year 2023\n")
        .assert()
        .success();

    cli(&home)
        .write_stdin("budgets\n")
        .assert()
        .success()
        .stdout(contains("Weekly Budget: Week 1"))
        .stdout(contains("2023-01-01 .. 2023-01-07"));
}

#[test]
fn errors_are_reported_and_the_shell_keeps_going() {
    let home = common::data_dir();
    cli(&home)
        .write_stdin("budgets\nuser carol\nnew-budget weekly 53 100\nbudgest\nperiod monthly 2 2024\n")
        .assert()
        .success()
        .stderr(contains("No active user"))
        .stderr(contains("out of range (expected 1..=52)"))
        .stderr(contains("Unknown command `budgest`"))
        .stdout(contains("Did you mean `budgets`?"))
        .stdout(contains("Monthly February of 2024: 2024-02-01 .. 2024-02-29 (29 days)"));
}

#[test]
fn version_reports_semver() {
    let home = common::data_dir();
    let output = cli(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8");
    let semver = Regex::new(r"budgetbud \d+\.\d+\.\d+ \(").expect("regex");
    assert!(semver.is_match(&text), "unexpected version output: {text}");
}

#[test]
fn config_changes_are_persisted() {
    let home = common::data_dir();
    cli(&home)
        .write_stdin("config set currency eur\nconfig set colour on\n")
        .assert()
        .success()
        .stdout(contains("Updated `currency`"))
        .stderr(contains("Unknown setting `colour`"));

    let config =
        std::fs::read_to_string(home.join("config/config.json")).expect("config file");
    assert!(config.contains("\"currency\": \"EUR\""));

    cli(&home)
        .write_stdin("config\n")
        .assert()
        .success()
        .stdout(contains("EUR").and(contains("default_frequency")));
}

#[test]
fn period_shows_items_dated_inside_it() {
    let home = common::data_dir();
    cli(&home)
        .write_stdin(
            "user jade\nnew-budget monthly 3 1000 --year 2024\nadd-expense 1 food 40 --date 2024-03-05 --note early\nadd-expense 1 food 61.25 --date 2024-03-20 --note late\n",
        )
        .assert()
        .success();

    cli(&home)
        .write_stdin("period weekly 10 2024\n")
        .assert()
        .success()
        .stdout(contains("Weekly Week 10 of 2024: 2024-03-04 .. 2024-03-10 (7 days)"))
        .stdout(contains("Actual expenses:"))
        .stdout(contains("USD 40.00  early"))
        .stdout(contains("late").not());
}

#[test]
fn help_lists_commands_by_section() {
    let home = common::data_dir();
    cli(&home)
        .write_stdin("help\nhelp period\n")
        .assert()
        .success()
        .stdout(contains("Budgets and periods"))
        .stdout(contains("Line items"))
        .stdout(contains("refresh"))
        .stdout(contains("usage: period [frequency] [index] [year]"));
}
