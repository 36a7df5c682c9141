use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn invoicer_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("invoicer"))
}

/// Write a config whose output directory is `out` inside the temp dir
fn write_config(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let out = temp_dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let config_path = temp_dir.path().join("config.ini");

    fs::write(
        &config_path,
        format!(
            r#"; shared by every invoice type
[DEFAULT]
from_name = Jane Doe
from_address = 1 High Street
from_city = London
from_postcode = N1 1AA
from_email = jane@example.com
bill_to_name = Accounts
bill_to_company = Client Ltd
bill_to_address = 2 Market Square
bill_to_city = Leeds
bill_to_postcode = LS1 2AB
payment_name = Example Bank
payment_account = 12345678
payment_sortcode = 00-11-22
invoice_filename_prefix = ACME
output_dir = {}

[retainer]
bill_for = Retainer
description = Monthly retainer
amount = 1500.00

# adds the sender company
[support]
bill_for = Support
description = Support hours
amount = 250.50
From_Company = Doe Consulting Ltd
"#,
            out.display()
        ),
    )
    .unwrap();

    (config_path, out)
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_help() {
    invoicer_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate batches of PDF invoices"));
}

#[test]
fn test_version() {
    invoicer_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("invoicer"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("settings").join("config.ini");

    invoicer_cmd()
        .args(["-c", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized invoice config"));

    assert!(config_path.exists());

    invoicer_cmd()
        .args(["-c", config_path.to_str().unwrap(), "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("consulting"));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, _) = write_config(&temp_dir);

    invoicer_cmd()
        .args(["-c", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent.ini");

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "generate",
            "-d",
            "20240101",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_types_lists_sections() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, _) = write_config(&temp_dir);

    invoicer_cmd()
        .args(["-c", config_path.to_str().unwrap(), "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TYPE"))
        .stdout(predicate::str::contains("retainer"))
        .stdout(predicate::str::contains("support"))
        .stdout(predicate::str::contains("DEFAULT").not());
}

#[test]
fn test_unknown_invoice_type_lists_options() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, out) = write_config(&temp_dir);

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "generate",
            "-t",
            "hourly",
            "-d",
            "20240101",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Generating invoice").not())
        .stderr(predicate::str::contains("Invalid invoice type 'hourly'"))
        .stderr(predicate::str::contains("options are retainer, support"));

    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_malformed_dates_are_reported_together() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, out) = write_config(&temp_dir);

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "generate",
            "-t",
            "retainer",
            "-d",
            "20240101",
            "2024-02-01",
            "20241301",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Generating invoice").not())
        .stderr(predicate::str::contains("'2024-02-01'"))
        .stderr(predicate::str::contains("'20241301'"))
        .stderr(predicate::str::contains("'20240101'").not());

    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_negative_invoice_number_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, _) = write_config(&temp_dir);

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "generate",
            "-i",
            "-3",
            "-d",
            "20240101",
        ])
        .assert()
        .failure();
}

#[test]
fn test_preview_orders_and_numbers_dates() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, out) = write_config(&temp_dir);

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "preview",
            "-t",
            "retainer",
            "-i",
            "7",
            "-d",
            "20240315",
            "20240101",
            "20240201",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"(?s)Invoice 0007 \(01-Jan-2024\).*Invoice 0008 \(01-Feb-2024\).*Invoice 0009 \(15-Mar-2024\)",
        )
        .unwrap())
        .stdout(predicate::str::contains("ACME_0007_01-Jan-2024.pdf"))
        .stdout(predicate::str::contains("£1500.00"))
        .stdout(predicate::str::contains("BILL TO:"))
        .stdout(predicate::str::contains("Payment details:"))
        .stdout(predicate::str::contains("Sort code: 00-11-22"));

    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_preview_shows_sender_company_when_configured() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, _) = write_config(&temp_dir);

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "preview",
            "-t",
            "support",
            "-d",
            "20240110",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Doe Consulting Ltd"))
        .stdout(predicate::str::contains("£250.50"))
        .stdout(predicate::str::contains("ACME_0001_10-Jan-2024.pdf"));
}

#[test]
fn test_generate_missing_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, out) = write_config(&temp_dir);
    fs::remove_dir(&out).unwrap();

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "generate",
            "-t",
            "retainer",
            "-d",
            "20240110",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Generating invoice 0001 (10-Jan-2024)"))
        .stdout(predicate::str::contains("Invoice written to").not())
        .stderr(predicate::str::contains("does not exist"));

    assert!(!out.exists());
}

#[test]
fn test_generate_missing_key() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, out) = write_config(&temp_dir);

    // DEFAULT alone has no description or amount
    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "generate",
            "-d",
            "20240110",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required config key 'bill_for'"));

    assert_eq!(file_count(&out), 0);
}

#[test]
fn test_default_type_uses_defaults_only() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, _) = write_config(&temp_dir);

    // same outcome as giving no type: DEFAULT has no bill_for
    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "preview",
            "-t",
            "DEFAULT",
            "-d",
            "20240110",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid invoice type").not())
        .stderr(predicate::str::contains("Missing required config key 'bill_for'"));
}

#[test]
fn test_invoice_number_overflow_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let (config_path, out) = write_config(&temp_dir);

    invoicer_cmd()
        .args([
            "-c",
            config_path.to_str().unwrap(),
            "generate",
            "-t",
            "retainer",
            "-i",
            "18446744073709551615",
            "-d",
            "20240101",
            "20240201",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Generating invoice").not())
        .stderr(predicate::str::contains("exceed"));

    assert_eq!(file_count(&out), 0);
}
