//! Integration tests for config loading from fixture files.
//!
//! These tests verify that the sample config file stays in sync with the
//! options the binary understands.

use std::fs;
use std::path::Path;

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn sample_config_has_pmatch_section() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let table = value.as_table().expect("should be a table");
    assert!(table.contains_key("pmatch"), "Config should have [pmatch] section");
}

#[test]
fn pmatch_section_has_expected_structure() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let pmatch = value.get("pmatch").expect("should have pmatch section");

    assert!(pmatch.get("dryrun").is_some());
    assert!(pmatch.get("extension").is_some());
    assert!(pmatch.get("move_files").is_some());
    assert!(pmatch.get("output_dir").is_some());
    assert!(pmatch.get("prefix").is_some());
    assert!(pmatch.get("verbose").is_some());
}

#[test]
fn pmatch_section_field_types_are_correct() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let pmatch = value.get("pmatch").expect("should have pmatch section");

    assert!(pmatch.get("dryrun").and_then(toml::Value::as_bool).is_some());
    assert!(pmatch.get("extension").and_then(toml::Value::as_str).is_some());
    assert!(pmatch.get("move_files").and_then(toml::Value::as_bool).is_some());
    assert!(pmatch.get("output_dir").and_then(toml::Value::as_str).is_some());
    assert!(pmatch.get("prefix").and_then(toml::Value::as_str).is_some());
    assert!(pmatch.get("verbose").and_then(toml::Value::as_bool).is_some());
}
