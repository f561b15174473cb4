use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("family_budget_cli")
        .unwrap()
        .env("FAMILY_BUDGET_CLI_SCRIPT", "1")
        .env("FAMILY_BUDGET_HOME", home)
        .env("RUST_LOG", "off")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_records_and_reports() {
    let home = TempDir::new().unwrap();
    let input = "\
limit comida 1000
add expense 1100 comida --note super
add expense 2 luz --currency USD
summary
budget
exit
";
    script(home.path(), input)
        .success()
        .stdout(contains("Recorded expense of $ 1.100,00 in Comida"))
        .stdout(contains("Recorded expense of US$ 2,00 in Luz"))
        .stdout(contains("$ 3.100,00"))
        .stdout(contains("100%").and(contains("over")));

    assert!(home
        .path()
        .join("data/shared/transactions.json")
        .exists());
}

#[test]
fn transactions_can_be_removed_in_a_later_session() {
    let home = TempDir::new().unwrap();
    let output = script(home.path(), "add income 5000 salario\n")
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let id_pattern = Regex::new(r"\(id ([0-9a-f-]{36})\)").unwrap();
    let id = &id_pattern.captures(&stdout).expect("transaction id in output")[1];

    script(home.path(), &format!("remove {id}\nlist\n"))
        .success()
        .stdout(contains("Removed income of $ 5.000,00"))
        .stdout(contains("No transactions recorded yet"));
}

#[test]
fn rejections_are_reported_without_stopping_the_script() {
    let home = TempDir::new().unwrap();
    script(
        home.path(),
        "category-remove comida\nsumary\nadd expense 10 nowhere\nsummary\n",
    )
    .success()
    .stderr(contains("built-in category and cannot be deleted"))
    .stderr(contains("Unknown command `sumary`"))
    .stdout(contains("Did you mean `summary`?"))
    .stderr(contains("Category not found: nowhere"))
    .stdout(contains("Balance"));
}

#[test]
fn help_describes_a_single_command() {
    let home = TempDir::new().unwrap();
    let output = script(home.path(), "help limit\n")
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    insta::assert_snapshot!(stdout.trim(), @r###"
    === Help: limit ===
      Set the monthly spending limit of a main category
      Usage: limit <category-id> <amount>
    "###);
}
