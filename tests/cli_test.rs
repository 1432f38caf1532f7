//! Integration tests for the parquet-fixtures binary
//!
//! Commands run against temporary output roots and are checked through their
//! --json output.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn fixtures_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_parquet-fixtures"))
}

fn run_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_str(&stdout).unwrap_or_else(|_| panic!("Failed to parse JSON: {}", stdout))
}

// =============================================================================
// list / show
// =============================================================================

#[test]
fn test_list_json() {
    let json = run_json(fixtures_bin().args(["list", "--json"]));

    let cases = json["cases"].as_array().unwrap();
    let ids: Vec<_> = cases.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec!["basic-nullable", "basic-required", "nested", "struct", "nested-edge"]
    );
    assert_eq!(json["matrix_jobs"], 60);
    assert_eq!(json["benchmark_jobs"], 36);
    assert_eq!(cases[1]["nullable_fields"], 0);
}

#[test]
fn test_show_json_renders_rows() {
    let json = run_json(fixtures_bin().args(["show", "basic_required", "--json"]));

    assert_eq!(json["id"], "basic-required");
    assert_eq!(json["rows"], 10);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data[0][0], "-256");
}

#[test]
fn test_show_unknown_case_fails() {
    let output = fixtures_bin().args(["show", "nope"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown case: nope"), "{}", stderr);
}

// =============================================================================
// generate / verify
// =============================================================================

#[test]
fn test_generate_then_verify() {
    let dir = TempDir::new().unwrap();

    let json = run_json(
        fixtures_bin()
            .arg("generate")
            .arg("--output")
            .arg(dir.path())
            .args(["--skip-bench", "--json"]),
    );
    assert_eq!(json["dry_run"], false);
    assert_eq!(json["statistics"]["jobs"], 60);
    assert_eq!(json["files"].as_array().unwrap().len(), 60);
    assert!(json["manifest"].as_str().unwrap().ends_with("manifest.json"));

    let json = run_json(
        fixtures_bin()
            .arg("verify")
            .arg("--output")
            .arg(dir.path())
            .arg("--json"),
    );
    assert_eq!(json["ok"], true);
    assert_eq!(json["verified"], 60);
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("out");

    let json = run_json(
        fixtures_bin()
            .arg("generate")
            .arg("-o")
            .arg(&root)
            .args(["--skip-matrix", "--dry-run", "--json"]),
    );
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["statistics"]["jobs"], 36);
    assert!(json.get("manifest").is_none());
    assert!(!root.exists());
}

#[test]
fn test_generate_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("fixtures.yaml");
    let root = dir.path().join("out");
    fs::write(
        &config,
        format!(
            "output: {}\nmatrix: false\nbenchmarks:\n  sizes: [64]\n",
            root.display()
        ),
    )
    .unwrap();

    let json = run_json(
        fixtures_bin()
            .arg("generate")
            .arg("--config")
            .arg(&config)
            .arg("--json"),
    );
    assert_eq!(json["statistics"]["jobs"], 6);
    assert!(root.join("v1/multi/snappy/benches_64.parquet").is_file());
}

#[test]
fn test_generate_rejects_bad_bench_size() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("fixtures.yaml");
    let root = dir.path().join("out");
    fs::write(
        &config,
        format!(
            "output: {}\nbenchmarks:\n  sizes: [1020]\n",
            root.display()
        ),
    )
    .unwrap();

    let output = fixtures_bin()
        .arg("generate")
        .arg("-c")
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1020"), "{}", stderr);
    assert!(!root.exists());
}

#[test]
fn test_verify_without_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let output = fixtures_bin()
        .arg("verify")
        .arg("-o")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// =============================================================================
// schema / completions
// =============================================================================

#[test]
fn test_schema_manifest() {
    let json = run_json(fixtures_bin().args(["schema", "--name", "manifest"]));
    assert!(json.get("properties").is_some());
    assert!(json["properties"].get("artifacts").is_some());
}

#[test]
fn test_completions_bash() {
    let output = fixtures_bin().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("parquet-fixtures"));
}
