#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const CATALOG: &str = r#"{
  "commands": {
    "storage.accounts-list": { "parameters": ["subscription", "resource-group"] },
    "storage.accounts-create": { "parameters": ["name", "location"] },
    "compute.vm-start": { "parameters": ["name"] },
    "compute.vm-stop": {}
  },
  "terms": { "resource group": "Resource group" }
}"#;

fn tooldoc() -> Command {
  Command::cargo_bin("tooldoc").expect("binary builds")
}

#[test]
fn generate_then_validate_round_trips_cleanly() {
  let temp = tempdir().expect("Failed to create temp dir in test");
  let catalog = temp.path().join("catalog.json");
  let docs = temp.path().join("docs");
  let report = temp.path().join("report.json");
  fs::write(&catalog, CATALOG).expect("Failed to write catalog in test");

  tooldoc()
    .current_dir(temp.path())
    .args(["generate", "--catalog"])
    .arg(&catalog)
    .arg("--output-dir")
    .arg(&docs)
    .assert()
    .success();

  let storage = fs::read_to_string(docs.join("storage.md"))
    .expect("Failed to read generated page in test");
  assert!(storage.contains("## Available operations"));
  assert!(storage.contains("### storage.accounts-list"));
  assert!(fs::metadata(docs.join("compute.md")).is_ok());

  tooldoc()
    .current_dir(temp.path())
    .args(["validate", "--input-dir"])
    .arg(&docs)
    .arg("--catalog")
    .arg(&catalog)
    .arg("--report")
    .arg(&report)
    .assert()
    .success();

  let report: serde_json::Value = serde_json::from_str(
    &fs::read_to_string(&report).expect("Failed to read report in test"),
  )
  .expect("report is valid JSON");

  let documents = report["documents"].as_array().expect("documents array");
  assert_eq!(documents.len(), 2);
  for document in documents {
    assert_eq!(document["is_valid"], true, "document: {}", document["id"]);
  }
  assert_eq!(report["cross_document"]["is_valid"], true);
}

#[test]
fn validation_failure_sets_a_nonzero_exit_code() {
  let temp = tempdir().expect("Failed to create temp dir in test");
  let catalog = temp.path().join("catalog.json");
  let docs = temp.path().join("docs");
  fs::write(&catalog, CATALOG).expect("Failed to write catalog in test");
  fs::create_dir_all(&docs).expect("Failed to create dir in test");
  fs::write(
    docs.join("broken.md"),
    "# Broken\n\nNo front matter and no required sections here.\n",
  )
  .expect("Failed to write broken.md in test");

  tooldoc()
    .current_dir(temp.path())
    .args(["validate", "--input-dir"])
    .arg(&docs)
    .arg("--catalog")
    .arg(&catalog)
    .assert()
    .failure();
}

#[test]
fn malformed_catalog_aborts_before_any_document() {
  let temp = tempdir().expect("Failed to create temp dir in test");
  let catalog = temp.path().join("catalog.json");
  let docs = temp.path().join("docs");
  fs::write(&catalog, "[1, 2, 3]").expect("Failed to write catalog in test");
  fs::create_dir_all(&docs).expect("Failed to create dir in test");

  tooldoc()
    .current_dir(temp.path())
    .args(["validate", "--input-dir"])
    .arg(&docs)
    .arg("--catalog")
    .arg(&catalog)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid command catalog"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
  let temp = tempdir().expect("Failed to create temp dir in test");
  let config = temp.path().join("tooldoc.toml");

  tooldoc()
    .current_dir(temp.path())
    .args(["init", "--output"])
    .arg(&config)
    .assert()
    .success();
  let written = fs::read_to_string(&config)
    .expect("Failed to read generated config in test");
  assert!(written.contains("[validation]"));

  tooldoc()
    .current_dir(temp.path())
    .args(["init", "--output"])
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));

  tooldoc()
    .current_dir(temp.path())
    .args(["init", "--force", "--output"])
    .arg(&config)
    .assert()
    .success();
}

#[test]
fn prompt_bank_collects_prompts_per_command() {
  let temp = tempdir().expect("Failed to create temp dir in test");
  let catalog = temp.path().join("catalog.json");
  let docs = temp.path().join("docs");
  let bank = temp.path().join("prompts.json");
  fs::write(&catalog, CATALOG).expect("Failed to write catalog in test");

  tooldoc()
    .current_dir(temp.path())
    .args(["generate", "--catalog"])
    .arg(&catalog)
    .arg("--output-dir")
    .arg(&docs)
    .assert()
    .success();

  tooldoc()
    .current_dir(temp.path())
    .args(["prompts", "--input-dir"])
    .arg(&docs)
    .arg("--catalog")
    .arg(&catalog)
    .arg("--output")
    .arg(&bank)
    .assert()
    .success();

  let bank: serde_json::Value = serde_json::from_str(
    &fs::read_to_string(&bank).expect("Failed to read prompt bank in test"),
  )
  .expect("prompt bank is valid JSON");

  let prompts = bank["storage.accounts-list"]
    .as_array()
    .expect("prompts for a known command");
  assert_eq!(prompts.len(), 5);
  assert!(bank.get("network.unknown").is_none());
}
