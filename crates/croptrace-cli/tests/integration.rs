//! Integration tests for CLI commands.

use std::process::Command;
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_croptrace"))
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    let success = output.status.success();

    (success, stdout, stderr)
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

const BATCH_JSON: &str = r#"{
    "batchId": "BCH001",
    "produceType": "Tomatoes",
    "farmer": "John Doe",
    "harvestDate": "2024-01-15",
    "qualityGrade": "A",
    "quantity": 1000,
    "location": "Farm A",
    "status": "REGISTERED"
}"#;

fn encode_batch(dir: &TempDir) -> String {
    let input = write_file(dir, "batch.json", BATCH_JSON);
    let (success, stdout, stderr) = run_cli(&[
        "encode",
        "--kind",
        "batch",
        "--secret",
        "test-secret",
        &input,
    ]);
    assert!(success, "encode failed: {}", stderr);
    stdout.trim().to_string()
}

#[test]
fn encode_emits_decodable_payload() {
    let dir = TempDir::new().unwrap();
    let payload = encode_batch(&dir);

    let value: serde_json::Value = serde_json::from_str(&payload).expect("Invalid JSON payload");
    assert_eq!(value["type"], "batch_tracking");
    assert_eq!(value["data"]["batchId"], "BCH001");
    assert!(value["signature"].is_string());
}

#[test]
fn encode_writes_image_artifact() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "batch.json", BATCH_JSON);
    let image_path = dir.path().join("qr.txt");
    let (success, _, stderr) = run_cli(&[
        "encode",
        "--kind",
        "batch",
        "--secret",
        "test-secret",
        "--image-out",
        image_path.to_string_lossy().as_ref(),
        &input,
    ]);
    assert!(success, "encode failed: {}", stderr);

    let data_url = std::fs::read_to_string(image_path).unwrap();
    assert!(data_url.starts_with("data:image/png;base64,"));
}

#[test]
fn verify_accepts_own_payload() {
    let dir = TempDir::new().unwrap();
    let payload = encode_batch(&dir);
    let payload_file = write_file(&dir, "payload.txt", &payload);

    let (success, stdout, _) =
        run_cli(&["verify", "--secret", "test-secret", "--strict", &payload_file]);
    assert!(success);
    assert!(stdout.contains("VERIFIED"));
}

#[test]
fn verify_flags_wrong_secret_as_untrusted() {
    let dir = TempDir::new().unwrap();
    let payload = encode_batch(&dir);
    let payload_file = write_file(&dir, "payload.txt", &payload);

    let (success, stdout, _) = run_cli(&["verify", "--secret", "wrong-secret", &payload_file]);
    assert!(success);
    assert!(stdout.contains("UNTRUSTED"));

    let (strict_success, _, _) = run_cli(&[
        "verify",
        "--secret",
        "wrong-secret",
        "--strict",
        &payload_file,
    ]);
    assert!(!strict_success);
}

#[test]
fn verify_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let payload_file = write_file(&dir, "payload.txt", "not a payload");

    let (success, stdout, _) = run_cli(&["verify", "--secret", "test-secret", &payload_file]);
    assert!(success);
    assert!(stdout.contains("REJECTED"));
}

#[test]
fn scan_enriches_from_store_file() {
    let dir = TempDir::new().unwrap();
    let payload = encode_batch(&dir);
    let payload_file = write_file(&dir, "payload.txt", &payload);
    let store_file = write_file(&dir, "store.json", &format!("[{}]", BATCH_JSON));

    let (success, stdout, _) = run_cli(&[
        "scan",
        "--secret",
        "test-secret",
        "--store",
        &store_file,
        "--json",
        &payload_file,
    ]);
    assert!(success);

    let output: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(output["outcome"], "RESOLVED");
    assert_eq!(output["trust"], "VERIFIED");
    assert_eq!(output["enrichment"]["status"], "FOUND");
    assert_eq!(output["enrichment"]["batch"]["batchId"], "BCH001");
}

#[test]
fn scan_without_store_reports_skipped_enrichment() {
    let dir = TempDir::new().unwrap();
    let payload = encode_batch(&dir);
    let payload_file = write_file(&dir, "payload.txt", &payload);

    let (success, stdout, _) = run_cli(&[
        "scan",
        "--secret",
        "test-secret",
        "--json",
        &payload_file,
    ]);
    assert!(success);

    let output: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(output["outcome"], "RESOLVED");
    assert_eq!(output["enrichment"]["status"], "SKIPPED");
}

#[test]
fn scan_missing_batch_still_resolves() {
    let dir = TempDir::new().unwrap();
    let payload = encode_batch(&dir);
    let payload_file = write_file(&dir, "payload.txt", &payload);
    let other_batch = BATCH_JSON.replace("BCH001", "BCH999");
    let store_file = write_file(&dir, "store.json", &format!("[{}]", other_batch));

    let (success, stdout, _) = run_cli(&[
        "scan",
        "--secret",
        "test-secret",
        "--store",
        &store_file,
        "--json",
        &payload_file,
    ]);
    assert!(success);

    let output: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(output["outcome"], "RESOLVED");
    assert_eq!(output["trust"], "VERIFIED");
    assert_eq!(output["enrichment"]["status"], "NOT_FOUND");
}

#[test]
fn inspect_pretty_prints_envelope() {
    let dir = TempDir::new().unwrap();
    let payload = encode_batch(&dir);
    let payload_file = write_file(&dir, "payload.txt", &payload);

    let (success, stdout, _) = run_cli(&["inspect", &payload_file]);
    assert!(success);
    assert!(stdout.contains("\"type\": \"batch_tracking\""));
    assert!(stdout.contains("\"batchId\": \"BCH001\""));
}
