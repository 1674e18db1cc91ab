//! End-to-end tests of the `flattree` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

const RECORDS: &str = r#"[
    {"id": 1, "parent_id": 0, "label": "Shop"},
    {"id": 2, "parent_id": 1, "label": "Shoes"},
    {"id": 3, "parent_id": 0, "label": "About"}
]"#;

fn flattree() -> Command {
    let mut cmd = Command::cargo_bin("flattree").unwrap();
    for var in ["ROOT", "ID", "PARENT", "PATH", "LABEL", "CHILDREN", "SORT_BY", "SORTBY"] {
        cmd.env_remove(format!("FLATTREE_{var}"));
    }
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn labels(tree: &Value) -> Vec<&str> {
    tree.as_array()
        .unwrap()
        .iter()
        .map(|node| node["label"].as_str().unwrap())
        .collect()
}

#[test]
fn test_build_with_flag_overrides() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "records.json", RECORDS);

    let tree = stdout_json(flattree().args([
        "build",
        input.to_str().unwrap(),
        "--parent",
        "parent_id",
        "--sort-by",
        "label",
    ]));

    assert_eq!(labels(&tree), vec!["About", "Shop"]);
    assert_eq!(tree[1]["sub"][0]["path"], json!(["Shop", "Shoes"]));
}

#[test]
fn test_build_with_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "records.json", RECORDS);
    let config = write(&dir, "tree.yaml", "parent: parent_id\nchildren: nodes\n");

    let tree = stdout_json(flattree().args([
        "--config",
        config.to_str().unwrap(),
        "build",
        input.to_str().unwrap(),
    ]));

    assert_eq!(labels(&tree), vec!["Shop", "About"]);
    assert_eq!(tree[0]["nodes"][0]["label"], json!("Shoes"));
}

#[test]
fn test_flags_override_environment() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "records.json", RECORDS);

    let tree = stdout_json(
        flattree()
            .env("FLATTREE_PARENT", "parent_id")
            .env("FLATTREE_SORT_BY", "id")
            .args(["build", input.to_str().unwrap(), "--sort-by", "label"]),
    );

    assert_eq!(labels(&tree), vec!["About", "Shop"]);
}

#[test]
fn test_build_reads_stdin() {
    let tree = stdout_json(
        flattree()
            .args(["build", "-", "--parent", "parent_id"])
            .write_stdin(RECORDS),
    );
    assert_eq!(labels(&tree), vec!["Shop", "About"]);
}

#[test]
fn test_build_yaml_output() {
    let dir = TempDir::new().unwrap();
    let input = write(
        &dir,
        "records.yaml",
        "a:\n  id: a\n  pid: top\n  label: Alpha\n",
    );

    flattree()
        .args([
            "build",
            input.to_str().unwrap(),
            "--root",
            "top",
            "--format",
            "yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("label: Alpha"))
        .stdout(predicate::str::contains("sub: []"));
}

#[test]
fn test_render_template_with_params() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "records.json", RECORDS);
    let template = write(
        &dir,
        "menu.liquid",
        "{{ title }}:{% for item in items %} {{ item.label }}{% endfor %}",
    );

    flattree()
        .args([
            "render",
            template.to_str().unwrap(),
            input.to_str().unwrap(),
            "--parent",
            "parent_id",
            "--param",
            "title=Menu",
        ])
        .assert()
        .success()
        .stdout("Menu: Shop About");
}

#[test]
fn test_render_missing_template_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "records.json", RECORDS);

    flattree()
        .args([
            "render",
            dir.path().join("missing.liquid").to_str().unwrap(),
            input.to_str().unwrap(),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not be found"));
}

#[test]
fn test_scalar_record_fails() {
    flattree()
        .args(["build", "-"])
        .write_stdin("[1, 2]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("items must be a mapping or an object"));
}

#[test]
fn test_missing_label_fails() {
    flattree()
        .args(["build", "-"])
        .write_stdin(r#"[{"id": 1, "pid": 0}]"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("the attribute 'label' does not exist"));
}
