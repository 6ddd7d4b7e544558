// SPDX-License-Identifier: AGPL-3.0-only
// Integration smoke tests for the CLI against a temporary local object store.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PEOPLE_CSV: &str = "age,email,name\n\
                          31,fake@email.com,Fake Namington\n\
                          10,bart@email.com,Bart Simpson\n";

/// Lay out `<root>/<bucket>/<key>` with the given body.
fn put_object(root: &Path, bucket: &str, key: &str, body: &str) {
    let path = root.join(bucket).join(key);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, body).expect("write object");
}

fn store_with_people() -> TempDir {
    let root = TempDir::new().expect("temp dir");
    put_object(root.path(), "test_bucket", "new_data/people.csv", PEOPLE_CSV);
    root
}

#[test]
fn masks_csv_named_by_flags() {
    let root = store_with_people();
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--store-root")
        .arg(root.path())
        .args(["--file", "s3://test_bucket/new_data/people.csv", "--pii", "email,name"])
        .assert()
        .success()
        .stdout("age,email,name\n31,***,***\n10,***,***\n");
}

#[test]
fn masks_jsonl_named_by_event_on_stdin() {
    let root = TempDir::new().expect("temp dir");
    put_object(
        root.path(),
        "test_bucket",
        "people.jsonl",
        "{\"age\": 31, \"email\": \"fake@email.com\"}\n{\"age\": 10, \"email\": \"bart@email.com\"}\n",
    );
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--store-root")
        .arg(root.path())
        .args(["--event", "-"])
        .write_stdin(r#"{"file_to_obfuscate": "s3://test_bucket/people.jsonl", "pii_fields": ["email"]}"#)
        .assert()
        .success()
        .stdout("{\"age\":31,\"email\":\"***\"}\n{\"age\":10,\"email\":\"***\"}\n");
}

#[test]
fn writes_json_result_to_output_file() {
    let root = TempDir::new().expect("temp dir");
    put_object(
        root.path(),
        "test_bucket",
        "people.json",
        r#"{"outer":[{"age":31,"email":"a@b.com","name":"X"}]}"#,
    );
    let out = root.path().join("masked.json");
    cargo_bin_cmd!("pii-obfuscator")
        .env("PII_OBFUSCATOR_STORE_ROOT", root.path())
        .args(["--file", "s3://test_bucket/people.json", "--pii", "email", "--pii", "name"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    let written = fs::read_to_string(out).expect("read output");
    assert_eq!(written, r#"{"outer":[{"age":31,"email":"***","name":"***"}]}"#);
}

#[test]
fn empty_field_list_returns_input_unchanged() {
    let root = store_with_people();
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--store-root")
        .arg(root.path())
        .args(["--file", "s3://test_bucket/new_data/people.csv"])
        .assert()
        .success()
        .stdout(PEOPLE_CSV);
}

#[test]
fn unknown_header_fails_with_no_output() {
    let root = store_with_people();
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--store-root")
        .arg(root.path())
        .args(["--file", "s3://test_bucket/new_data/people.csv", "--pii", "phone,name"])
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("The pii_field 'phone' not found in headers."));
}

#[test]
fn unsupported_suffix_is_rejected() {
    let root = store_with_people();
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--store-root")
        .arg(root.path())
        .args(["--file", "s3://test_bucket/notes.txt"])
        .assert()
        .failure()
        .stderr(contains("Unsupported file format").and(contains("notes.txt")));
}

#[test]
fn missing_object_is_reported() {
    let root = store_with_people();
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--store-root")
        .arg(root.path())
        .args(["--file", "s3://test_bucket/absent.csv"])
        .assert()
        .failure()
        .stderr(contains("The specified key does not exist"));
}

#[test]
fn malformed_uri_is_reported() {
    cargo_bin_cmd!("pii-obfuscator")
        .args(["--file", "s3:///key.csv"])
        .assert()
        .failure()
        .stderr(contains("S3 URI must include bucket and key: s3:///key.csv"));
}

#[test]
fn invalid_event_lists_every_problem() {
    cargo_bin_cmd!("pii-obfuscator")
        .args(["--event", "-"])
        .write_stdin(r#"{"file_to_obfuscate": 3, "fields": []}"#)
        .assert()
        .failure()
        .stderr(
            contains("missing key 'pii_fields'")
                .and(contains("unexpected key 'fields'"))
                .and(contains("'file_to_obfuscate' must be a string")),
        );
}

#[test]
fn formats_flag_lists_suffixes() {
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--formats")
        .assert()
        .success()
        .stdout(contains(".csv").and(contains(".jsonl")).and(contains(".json")));
}

#[test]
fn version_flag_prints_banner() {
    cargo_bin_cmd!("pii-obfuscator")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("pii-obfuscator").and(contains("commit:")));
}
