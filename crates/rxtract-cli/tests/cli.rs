//! Integration tests for the rxtract CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CORNER_DELI: &str =
    "Store Name: Corner Deli\n123 Main Street, NY\n3/14/2024\n2 Coffee $4.50\nTax $0.50\n$5.00\nCash";

/// CLI command isolated from any user config file.
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rxtract"));
    cmd.arg("--config").arg(dir.path().join("config.json"));
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_extract_file_as_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("receipt.txt");
    fs::write(&input, CORNER_DELI).unwrap();

    cli(&dir)
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"storeName\": \"Corner Deli\""))
        .stdout(predicate::str::contains("\"amount\": \"$5.00\""))
        .stdout(predicate::str::contains("\"item\": \"2 Coffee\""));
}

#[test]
fn test_extract_stdin_as_csv() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["extract", "--format", "csv"])
        .write_stdin(CORNER_DELI)
        .assert()
        .success()
        .stdout(predicate::str::contains("storeName,Corner Deli\n"))
        .stdout(predicate::str::contains("taxAmount,$0.50\n"))
        .stdout(predicate::str::contains("orderDetails,2 Coffee $4.50\n"));
}

#[test]
fn test_extract_text_table_and_warnings() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["extract", "--format", "text", "--warnings"])
        .write_stdin(CORNER_DELI)
        .assert()
        .success()
        .stdout(predicate::str::contains("Payment Method"))
        .stdout(predicate::str::contains("Cash"))
        .stderr(predicate::str::contains("Could not extract invoice number"));
}

#[test]
fn test_extract_from_record_round_trip() {
    let dir = TempDir::new().unwrap();
    let exported = dir.path().join("extracted_data.json");

    cli(&dir)
        .args(["extract", "-o"])
        .arg(&exported)
        .write_stdin(CORNER_DELI)
        .assert()
        .success();

    let first = fs::read_to_string(&exported).unwrap();

    cli(&dir)
        .args(["extract", "--from-record"])
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", first)));
}

#[test]
fn test_extract_vendor_heuristic_flag() {
    let dir = TempDir::new().unwrap();
    let text = "Green Leaf\n10 Park Ave\nSweetgreen rewards";

    cli(&dir)
        .args(["extract", "--vendor", "words"])
        .write_stdin(text)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"vendorName\": \"Green Leaf\""));

    cli(&dir)
        .arg("extract")
        .write_stdin(text)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"vendorName\": \"Sweetgreen\""));
}

#[test]
fn test_extract_missing_file() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_rejects_non_image() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("receipt.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();

    cli(&dir)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload an image file"));
}

#[test]
fn test_process_without_models() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("receipt.png");
    fs::write(&input, b"not really a png").unwrap();
    let models = dir.path().join("models");
    fs::create_dir_all(&models).unwrap();

    cli(&dir)
        .arg("process")
        .arg(&input)
        .arg("--model-dir")
        .arg(&models)
        .assert()
        .failure()
        .stderr(predicate::str::contains("model file not found"))
        .stderr(predicate::str::contains("rxtract models download"));
}

#[test]
fn test_batch_without_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.png");

    cli(&dir)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching image files"));
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");

    cli(&dir).args(["config", "init"]).assert().success();
    assert!(config_path.exists());

    cli(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli(&dir)
        .args(["config", "get", "extraction.vendor_heuristic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brand_parity"));

    cli(&dir)
        .args(["config", "set", "extraction.vendor_heuristic", "words_before_digit"])
        .assert()
        .success();

    cli(&dir)
        .args(["config", "get", "extraction.vendor_heuristic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("words_before_digit"));

    // The configured heuristic is used by extract
    cli(&dir)
        .arg("extract")
        .write_stdin("Green Leaf\n10 Park Ave\nSweetgreen")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"vendorName\": \"Green Leaf\""));
}

#[test]
fn test_config_set_rejects_unknown_key_and_bad_value() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["config", "set", "ocr.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    cli(&dir)
        .args(["config", "set", "export.default_format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_config_default_format_applies() {
    let dir = TempDir::new().unwrap();

    cli(&dir)
        .args(["config", "set", "export.default_format", "csv"])
        .assert()
        .success();

    cli(&dir)
        .arg("extract")
        .write_stdin("Cash")
        .assert()
        .success()
        .stdout(predicate::str::contains("paymentMethod,Cash"));
}

#[test]
fn test_models_path_and_status() {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("models");

    cli(&dir)
        .args(["models", "path", "--model-dir"])
        .arg(&models)
        .assert()
        .success()
        .stdout(predicate::str::contains("models"));

    cli(&dir)
        .args(["models", "status", "--model-dir"])
        .arg(&models)
        .assert()
        .success()
        .stdout(predicate::str::contains("det.onnx"))
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn test_models_download_from_local_dir() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("mirror");
    let models = dir.path().join("models");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("det.onnx"), b"det").unwrap();
    fs::write(source.join("latin_rec.onnx"), b"rec").unwrap();

    // dictionary missing from the mirror
    cli(&dir)
        .args(["models", "download", "--from"])
        .arg(&source)
        .arg("--output")
        .arg(&models)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 model file(s) failed"));
    assert!(models.join("det.onnx").exists());
    assert!(!models.join("latin_dict.txt").exists());
    assert!(!models.join("latin_dict.txt.part").exists());

    fs::write(source.join("latin_dict.txt"), b"a\nb\n").unwrap();
    cli(&dir)
        .args(["models", "download", "--from"])
        .arg(&source)
        .arg("--output")
        .arg(&models)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("Ready"));
    assert_eq!(fs::read(models.join("latin_dict.txt")).unwrap(), b"a\nb\n");
}
