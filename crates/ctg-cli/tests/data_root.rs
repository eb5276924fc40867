//! Integration tests: subcommand handlers against a data root on disk.
//!
//! Each test lays out a temporary data root the way the dataset repository
//! is organized (`KEYWORDS/`, `PROJECTS.json`, `TEMPLATES/`, record
//! directories) using the record fixtures shared with `ctg-schema`.

use std::path::{Path, PathBuf};

use ctg_cli::config::CliConfig;
use ctg_cli::keywords::{run_keywords, KeywordsArgs};
use ctg_cli::schema::{run_schema, SchemaArgs};
use ctg_cli::template::{run_template, TemplateArgs};
use ctg_cli::validate::{run_validate, ValidateArgs};
use serde_json::{json, Value};
use tempfile::TempDir;

fn schema_fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("ctg-schema")
        .join("tests")
        .join("fixtures")
        .join(name);
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn write_json(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// A data root with one valid and one invalid indexed record.
fn data_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_json(&root.join("KEYWORDS").join("KEYWORDS.json"), &schema_fixture("keywords.json"));

    let good = schema_fixture("project_full.json");
    let mut bad = schema_fixture("project_minimal.json");
    bad["project"]["keywords"] = json!(["not_a_keyword"]);

    write_json(&root.join("projects").join("good-id.json"), &good);
    write_json(&root.join("drafts").join("bad-id.json"), &bad);
    write_json(
        &root.join("PROJECTS.json"),
        &json!({
            "good-id": {"path": "/projects/"},
            "bad-id": {"path": "/drafts/"}
        }),
    );

    let mut template = schema_fixture("project_minimal.json");
    template["record_metadata"]["uuid"] = json!("");
    template["record_metadata"]["record_created_on"] = json!("");
    template["project"]["type"] = json!("");
    write_json(&root.join("TEMPLATES").join("project.json"), &template);

    dir
}

fn validate(root: &Path, all: bool, paths: &[&str]) -> u8 {
    let args = ValidateArgs {
        all,
        paths: paths.iter().map(PathBuf::from).collect(),
    };
    run_validate(&args, &CliConfig::default(), root).unwrap()
}

#[test]
fn validate_single_passing_record() {
    let dir = data_root();
    assert_eq!(validate(dir.path(), false, &["projects/good-id.json"]), 0);
}

#[test]
fn validate_single_failing_record() {
    let dir = data_root();
    assert_eq!(validate(dir.path(), false, &["drafts/bad-id.json"]), 1);
}

#[test]
fn validate_all_reports_failure_without_stopping() {
    let dir = data_root();
    assert_eq!(validate(dir.path(), true, &[]), 1);
}

#[test]
fn validate_all_passes_once_fixed() {
    let dir = data_root();
    write_json(
        &dir.path().join("drafts").join("bad-id.json"),
        &schema_fixture("project_minimal.json"),
    );
    assert_eq!(validate(dir.path(), true, &[]), 0);
}

#[test]
fn validate_yaml_record() {
    let dir = data_root();
    let record = schema_fixture("project_full.json");
    let yaml = serde_yaml::to_string(&record).unwrap();
    std::fs::write(dir.path().join("draft.yaml"), yaml).unwrap();
    assert_eq!(validate(dir.path(), false, &["draft.yaml"]), 0);
}

#[test]
fn validate_unreadable_record_is_operational_error() {
    let dir = data_root();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();
    assert_eq!(validate(dir.path(), false, &["projects/good-id.json", "broken.json"]), 2);
}

#[test]
fn validate_index_entry_without_file_is_operational_error() {
    let dir = data_root();
    std::fs::remove_file(dir.path().join("projects").join("good-id.json")).unwrap();
    assert_eq!(validate(dir.path(), true, &[]), 2);
}

#[test]
fn validate_uses_configured_index() {
    let dir = data_root();
    write_json(&dir.path().join("index").join("only-good.json"), &json!({"good-id": {"path": "/projects/"}}));
    std::fs::write(dir.path().join("ctg.yaml"), "projects_index: index/only-good.json\n").unwrap();
    let config = CliConfig::load(None, dir.path()).unwrap();
    let args = ValidateArgs { all: true, paths: Vec::new() };
    assert_eq!(run_validate(&args, &config, dir.path()).unwrap(), 0);
}

#[test]
fn validate_without_taxonomy_is_an_error() {
    let dir = data_root();
    std::fs::remove_dir_all(dir.path().join("KEYWORDS")).unwrap();
    let args = ValidateArgs { all: true, paths: Vec::new() };
    assert!(run_validate(&args, &CliConfig::default(), dir.path()).is_err());
}

#[test]
fn keywords_command_succeeds() {
    let dir = data_root();
    let code = run_keywords(&KeywordsArgs { list: false }, &CliConfig::default(), dir.path()).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn template_stamps_and_validates() {
    let dir = data_root();
    let args = TemplateArgs { path: None, print: false };
    assert_eq!(run_template(&args, &CliConfig::default(), dir.path()).unwrap(), 0);
}

#[test]
fn template_with_stale_schema_version_fails() {
    let dir = data_root();
    let path = dir.path().join("TEMPLATES").join("project.json");
    let mut template: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    template["schema_version"] = json!("0.1.7");
    write_json(&path, &template);

    let args = TemplateArgs { path: None, print: true };
    assert_eq!(run_template(&args, &CliConfig::default(), dir.path()).unwrap(), 1);
}

#[test]
fn schema_outline_is_strict() {
    let dir = data_root();
    for json in [false, true] {
        assert_eq!(run_schema(&SchemaArgs { json }, &CliConfig::default(), dir.path()).unwrap(), 0);
    }
}
