//! End-to-end tests for the recibo binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const RECEIPT: &str =
    "Supermercado ABC S.A. - Total: $150.00 - Fecha: 15/01/2025 - Compra de alimentos";

fn recibo() -> Command {
    Command::cargo_bin("recibo").unwrap()
}

#[test]
fn test_extract_json_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("receipt.txt");
    fs::write(&input, RECEIPT).unwrap();

    recibo()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("150.00"))
        .stdout(predicate::str::contains("2025-01-15"))
        .stdout(predicate::str::contains("Supermercado ABC"));
}

#[test]
fn test_extract_reads_stdin() {
    recibo()
        .args(["extract", "-"])
        .write_stdin("Total: $45.90")
        .assert()
        .success()
        .stdout(predicate::str::contains("45.90"));
}

#[test]
fn test_extract_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");

    recibo()
        .arg("extract")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_extract_empty_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blank.txt");
    fs::write(&input, "   \n").unwrap();

    recibo()
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text"));
}

#[test]
fn test_extract_rejects_out_of_range_ocr_confidence() {
    // Validation fires before any input is read.
    recibo()
        .args(["extract", "-", "--ocr-confidence", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn test_extract_text_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("receipt.txt");
    fs::write(&input, RECEIPT).unwrap();

    recibo()
        .arg("extract")
        .arg(&input)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs review: no"))
        .stdout(predicate::str::contains("Provider:"));
}

#[test]
fn test_extract_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("receipt.txt");
    let output = dir.path().join("result.json");
    fs::write(&input, RECEIPT).unwrap();

    recibo()
        .arg("extract")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"fields\""));
    assert!(written.contains("150.00"));
}

#[test]
fn test_batch_with_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    fs::write(dir.path().join("good.txt"), RECEIPT).unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();

    recibo()
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out_dir.join("good.json").exists());
    assert!(!out_dir.join("empty.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("good.txt,success"));
    assert!(summary.contains("empty.txt,error"));
}

#[test]
fn test_batch_stops_on_first_error_by_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();

    recibo()
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_batch_without_matches_fails() {
    let dir = tempfile::tempdir().unwrap();

    recibo()
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching"));
}

#[test]
fn test_config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    recibo()
        .args(["config", "show", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No config file found"))
        .stdout(predicate::str::contains("USD"));
}

#[test]
fn test_config_init_get_set_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    recibo()
        .args(["config", "init", "--config"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.exists());

    recibo()
        .args(["config", "set", "extraction.default_currency", "EUR", "--config"])
        .arg(&config)
        .assert()
        .success();

    recibo()
        .args(["config", "get", "extraction.default_currency", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("EUR"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    recibo()
        .args(["config", "set", "extraction.typo_key", "5", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_set_rejects_invalid_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    recibo()
        .args(["config", "set", "escalation.threshold", "1.5", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn test_config_aware_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{"extraction": {"default_currency": "MXN", "date_order": "day_first"}}"#,
    )
    .unwrap();

    recibo()
        .args(["extract", "-", "--config"])
        .arg(&config)
        .write_stdin("Tienda Central S.A. - Total: 45.90 - 03/04/2025")
        .assert()
        .success()
        .stdout(predicate::str::contains("MXN"))
        .stdout(predicate::str::contains("2025-04-03"));
}
