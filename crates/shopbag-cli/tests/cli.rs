//! Integration tests for the shopbag binary.
//!
//! Each test runs with `XDG_CONFIG_HOME` pointed at a temporary directory so a
//! user's own config file never leaks in.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../shopbag-core/tests/fixtures")
        .join(name)
}

fn shopbag(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shopbag").expect("binary should build");
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

#[test]
fn test_process_json() {
    let home = TempDir::new().unwrap();

    shopbag(home.path())
        .arg("process")
        .arg(fixture("mart.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""merchant":"MART""#))
        .stdout(predicate::str::contains(r#""date":"2024-06-15""#))
        .stdout(predicate::str::contains(r#""total":"23.50""#))
        .stdout(predicate::str::contains(r#""unitPrice":"2.00""#));
}

#[test]
fn test_process_textract_csv() {
    let home = TempDir::new().unwrap();

    shopbag(home.path())
        .args(["process", "--format", "csv"])
        .arg(fixture("textract_market.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "merchant,date,total,currency,item_index,name,quantity,price,unit_price",
        ))
        .stdout(predicate::str::contains(
            "FRUTAS GARCIA S.L.,2023-11-03,7.87,EUR,0,PLATANO CANARIAS,1.235,3.08,2.49",
        ));
}

#[test]
fn test_process_to_file() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let output_path = out.path().join("receipt.txt");

    shopbag(home.path())
        .args(["process", "-f", "text", "-o"])
        .arg(&output_path)
        .arg(fixture("mart.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let content = fs::read_to_string(&output_path).unwrap();
    assert!(content.contains("Merchant: MART"));
    assert!(content.contains("Total:    23.50 EUR"));
}

#[test]
fn test_process_failure_reports_item() {
    let home = TempDir::new().unwrap();

    shopbag(home.path())
        .arg("process")
        .arg(fixture("missing_price.json"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("could not analyze receipt"))
        .stderr(predicate::str::contains("item #1: empty price"));
}

#[test]
fn test_process_missing_file() {
    let home = TempDir::new().unwrap();

    shopbag(home.path())
        .args(["process", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_uses_config_pivot() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    let input = dir.path().join("short_year.json");
    fs::write(
        &input,
        r#"{
            "summaryFields": [
                {"label": "VENDOR_NAME", "text": "MART"},
                {"label": "INVOICE_RECEIPT_DATE", "text": "15.06.60"},
                {"label": "TOTAL", "text": "1,00"}
            ],
            "lineItemGroups": []
        }"#,
    )
    .unwrap();

    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"extraction": {"two_digit_year_pivot": 50}}"#).unwrap();

    shopbag(home.path())
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""date":"2060-06-15""#));

    shopbag(home.path())
        .arg("-c")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""date":"1960-06-15""#));
}

#[test]
fn test_batch_with_summary() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    for name in ["mart.json", "textract_market.json", "missing_price.json"] {
        fs::copy(fixture(name), input.path().join(name)).unwrap();
    }
    let pattern = format!("{}/*.json", input.path().display());

    shopbag(home.path())
        .args(["batch", &pattern, "--summary", "--continue-on-error", "-j", "2", "-o"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 1 failed"));

    assert!(out.path().join("mart.json").exists());
    assert!(out.path().join("textract_market.json").exists());
    assert!(!out.path().join("missing_price.json").exists());

    let summary = fs::read_to_string(out.path().join("summary.csv")).unwrap();
    assert!(summary.contains("mart.json,success,MART,2024-06-15,23.50,EUR,2,"));
    assert!(summary.contains("missing_price.json,error,"));
    assert!(summary.contains("item #1: empty price"));
}

#[test]
fn test_batch_stops_on_error() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();

    fs::copy(fixture("missing_price.json"), input.path().join("missing_price.json")).unwrap();
    let pattern = format!("{}/*.json", input.path().display());

    shopbag(home.path())
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_batch_reports_duplicates() {
    let home = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();

    fs::copy(fixture("mart.json"), input.path().join("a.json")).unwrap();
    fs::copy(fixture("mart.json"), input.path().join("b.json")).unwrap();
    let pattern = format!("{}/*.json", input.path().display());

    shopbag(home.path())
        .args(["batch", &pattern])
        .assert()
        .success()
        .stdout(predicate::str::contains("Possible duplicates:"));
}

#[test]
fn test_config_path_and_init() {
    let home = TempDir::new().unwrap();

    shopbag(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shopbag"))
        .stdout(predicate::str::contains("not created"));

    shopbag(home.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(home.path().join("shopbag/config.json").exists());

    shopbag(home.path())
        .args(["config", "set", "extraction.two_digit_year_pivot", "50"])
        .assert()
        .success();

    shopbag(home.path())
        .args(["config", "get", "extraction.two_digit_year_pivot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50"));
}

#[test]
fn test_config_set_rejects_bad_pivot() {
    let home = TempDir::new().unwrap();

    shopbag(home.path())
        .args(["config", "set", "extraction.two_digit_year_pivot", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("two_digit_year_pivot"));
}

#[test]
fn test_config_unknown_key_and_bad_value() {
    let home = TempDir::new().unwrap();

    shopbag(home.path())
        .args(["config", "set", "extraction.pivot", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key: extraction.pivot"))
        .stderr(predicate::str::contains("extraction.two_digit_year_pivot"));

    shopbag(home.path())
        .args(["config", "get", "output.colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key: output.colour"));

    shopbag(home.path())
        .args(["config", "set", "output.format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value \"yaml\" for output.format"));
}

#[test]
fn test_process_rejects_unpadded_date() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    let input = dir.path().join("unpadded.json");
    fs::write(
        &input,
        r#"{
            "summaryFields": [
                {"label": "VENDOR_NAME", "text": "MART"},
                {"label": "INVOICE_RECEIPT_DATE", "text": "1.2.23"},
                {"label": "TOTAL", "text": "1,00"}
            ],
            "lineItemGroups": []
        }"#,
    )
    .unwrap();

    shopbag(home.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match layout dd.mm.yy"));
}
