//! Integration tests for the psy CLI

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `psy` with an empty config file, so no user configuration leaks in.
fn psy(dir: &TempDir) -> Command {
    let config = dir.path().join("empty.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("psy").unwrap();
    cmd.current_dir(dir.path()).arg("--config").arg(config);
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("psy").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PHP snippets"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("psy").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_clean_expr() {
    let dir = TempDir::new().unwrap();
    psy(&dir)
        .args(["clean", "--expr", "4"])
        .assert()
        .success()
        .stdout("return 4;\n");
}

#[test]
fn test_clean_files_share_a_session() {
    let dir = TempDir::new().unwrap();
    let first = write(&dir, "first.php", "<?php\nnamespace App;\nuse ArrayObject as Store;\n");
    let second = write(&dir, "second.php", "new Store();\n");
    psy(&dir)
        .arg("clean")
        .arg(first)
        .arg(second)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "namespace App;\n\nreturn new \\ArrayObject();",
        ));
}

#[test]
fn test_clean_rejects_missing_class() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "bad.php", "$a = 1;\nnew Missing();\n");
    psy(&dir)
        .arg("clean")
        .arg(file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Class 'Missing' not found"));
}

#[test]
fn test_clean_reports_incomplete_input() {
    let dir = TempDir::new().unwrap();
    psy(&dir)
        .args(["clean", "--expr", "if ($a) {"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected end of input"));
}

#[test]
fn test_repl_reads_stdin() {
    let dir = TempDir::new().unwrap();
    psy(&dir)
        .arg("repl")
        .write_stdin("if (true) {\n1;\n}\nnew Missing();\n$a = 2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("return 1;"))
        .stdout(predicate::str::contains("return $a = 2;"))
        .stderr(predicate::str::contains("Class 'Missing' not found"));
}

#[test]
fn test_repl_loads_files_first() {
    let dir = TempDir::new().unwrap();
    let setup = write(&dir, "setup.php", "function greet($name) { return $name; }\n");
    psy(&dir)
        .arg("repl")
        .arg("--load")
        .arg(setup)
        .write_stdin("function greet() {}\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Cannot redeclare greet()"));
}

#[test]
fn test_parse_prints_code() {
    let dir = TempDir::new().unwrap();
    psy(&dir)
        .args(["parse", "--expr", "if ($a) { $b = 1; }"])
        .assert()
        .success()
        .stdout("if ($a) {\n    $b = 1;\n}\n");
}

#[test]
fn test_parse_json() {
    let dir = TempDir::new().unwrap();
    psy(&dir)
        .args(["parse", "--json", "--expr", "$a = 1;"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Assign\""));
}

#[test]
fn test_parse_error() {
    let dir = TempDir::new().unwrap();
    psy(&dir)
        .args(["parse", "--expr", "$a = ;"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PHP Parse error"));
}

#[test]
fn test_symbols_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("symbols.json");
    psy(&dir)
        .arg("symbols")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();
    let json = fs::read_to_string(output).unwrap();
    assert!(json.contains("BreakException"));
}

#[test]
fn test_config_reads_file() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "psysh.toml",
        "php_version = \"7.1\"\n\n[repl]\nprompt = \"php> \"\n",
    );
    let mut cmd = Command::cargo_bin("psy").unwrap();
    cmd.current_dir(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("php_version = \"7.1\""))
        .stdout(predicate::str::contains("prompt = \"php> \""));
}

#[test]
fn test_php_version_gates_checks() {
    let dir = TempDir::new().unwrap();
    write(&dir, "old.toml", "php_version = \"7.2\"\n");
    let mut cmd = Command::cargo_bin("psy").unwrap();
    cmd.current_dir(dir.path())
        .args(["--config", "old.toml", "clean", "--expr", "'a' instanceof stdClass;"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("instanceof expects an object instance"));
}
