#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

const FOLLOW_DOC: &str = r#"
[[steps]]
op = "match"
pattern = [{ kind = "node", alias = "a", label = "User", props = { name = "Alice", age = 30 } }]

[[steps]]
op = "merge"
pattern = [
    { kind = "node", alias = "a" },
    { kind = "rel", alias = "f", type = "FOLLOWS", direction = "outgoing", props = { since = 2023 } },
    { kind = "node", alias = "b", label = "User", props = { name = "Bob" } },
]

[[steps]]
op = "return"
aliases = ["a", "f", "b"]
"#;

fn write_file(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write fixture");
    path
}

fn isolated_config(dir: &TempDir) -> PathBuf {
    dir.path().join("no-config.toml")
}

#[test]
fn render_emits_json() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_file(&dir, "follow.toml", FOLLOW_DOC);
    let output = cargo_bin_cmd!("cli")
        .arg("--config")
        .arg(isolated_config(&dir))
        .args(["render", "--format", "json"])
        .arg(&doc)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(
        json["query"],
        "MATCH (a:User {name: $pname_0, age: $page_1})\n\
         MERGE (a)-[f:FOLLOWS {since: $psince_2}]->(b:User {name: $pname_3})\n\
         RETURN a, f, b"
    );
    assert_eq!(json["params"]["pname_0"], "Alice");
    assert_eq!(json["params"]["page_1"], 30);
    assert_eq!(json["params"]["psince_2"], 2023);
    assert_eq!(json["params"]["pname_3"], "Bob");
}

#[test]
fn render_sorted_flag_orders_properties() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_file(&dir, "follow.toml", FOLLOW_DOC);
    let output = cargo_bin_cmd!("cli")
        .arg("--config")
        .arg(isolated_config(&dir))
        .args(["render", "--sorted", "--format", "json"])
        .arg(&doc)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: Value = serde_json::from_slice(&output).expect("valid json");
    let query = json["query"].as_str().expect("query text");
    assert!(query.starts_with("MATCH (a:User {age: $page_0, name: $pname_1})"));
}

#[test]
fn config_file_supplies_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_file(&dir, "follow.toml", FOLLOW_DOC);
    let config = write_file(
        &dir,
        "cypher.toml",
        "format = \"json\"\n[builder]\nmax_parameters = 2\n",
    );
    let output = cargo_bin_cmd!("cli")
        .arg("--config")
        .arg(&config)
        .arg("render")
        .arg(&doc)
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("error: [TooManyParameters] query exceeds 2 parameters"), "{stderr}");
}

#[test]
fn render_text_reports_malformed_query() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_file(
        &dir,
        "delete.json",
        r#"{"steps": [{"op": "delete", "aliases": ["u"]}, {"op": "return", "aliases": ["u"]}]}"#,
    );
    let output = cargo_bin_cmd!("cli")
        .arg("--config")
        .arg(isolated_config(&dir))
        .arg("render")
        .arg(&doc)
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(
        stderr.contains("error: [Malformed] query must have at least one MATCH, CREATE, or MERGE clause"),
        "{stderr}"
    );
}

#[test]
fn render_text_prints_query_and_params() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_file(
        &dir,
        "post.json",
        r#"{"steps": [
            {"op": "match", "pattern": [{"kind": "node", "alias": "p", "label": "Post", "props": {"title": "My First Post"}}]},
            {"op": "detach_delete", "aliases": ["p"]}
        ]}"#,
    );
    let output = cargo_bin_cmd!("cli")
        .arg("--config")
        .arg(isolated_config(&dir))
        .arg("render")
        .arg(&doc)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("utf8");
    assert_eq!(
        stdout,
        "MATCH (p:Post {title: $ptitle_0})\nDETACH DELETE p\n\nparams: {\n  \"ptitle_0\": \"My First Post\"\n}\n"
    );
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let doc = write_file(&dir, "query.yaml", "steps: []");
    cargo_bin_cmd!("cli")
        .arg("--config")
        .arg(isolated_config(&dir))
        .arg("render")
        .arg(&doc)
        .assert()
        .failure();
}

#[test]
fn config_path_honours_override() {
    let dir = TempDir::new().expect("tempdir");
    let config = isolated_config(&dir);
    let output = cargo_bin_cmd!("cli")
        .arg("--config")
        .arg(&config)
        .arg("config-path")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(
        String::from_utf8(output).expect("utf8").trim_end(),
        config.display().to_string()
    );
}
