#![allow(deprecated)]
//! Exit-code and output contract of the two binaries.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_VARS: [&str; 11] = [
    "DATA_SOURCE",
    "AWS_BUCKET_NAME",
    "AWS_REGION",
    "SENTIFLOW_PARAMS",
    "SENTIFLOW_MODEL_NAME",
    "MLFLOW_TRACKING_URI",
    "MLFLOW_TRACKING_USERNAME",
    "MLFLOW_TRACKING_PASSWORD",
    "MLFLOW_TRACKING_TOKEN",
    "MLFLOW_HTTP_REQUEST_TIMEOUT",
    "RUST_LOG",
];

fn isolated(bin: &str, dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin(bin).unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.current_dir(dir);
    cmd
}

fn reviews_csv(positive: usize, negative: usize) -> String {
    let mut csv = String::from("review,sentiment\n");
    for i in 0..positive {
        csv.push_str(&format!("loved it {},positive\n", i));
    }
    for i in 0..negative {
        csv.push_str(&format!("hated it {},negative\n", i));
    }
    csv.push_str("meh,neutral\n");
    csv
}

#[test]
fn test_ingestion_help() {
    let dir = tempdir().unwrap();
    isolated("data-ingestion", dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--params"))
        .stdout(predicate::str::contains("--data-path"));
}

#[test]
fn test_ingestion_s3_without_bucket_is_config_error() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("params.yaml"),
        "data_ingestion:\n  test_size: 0.2\n",
    )
    .unwrap();

    isolated("data-ingestion", dir.path())
        .env("DATA_SOURCE", "S3")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("AWS_BUCKET_NAME"));

    assert!(!dir.path().join("data").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ingestion_unknown_source_falls_back_to_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reviews_csv(6, 4)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("params.yaml"),
        format!(
            "data_ingestion:\n  test_size: 0.2\n  source_url: {}/data.csv\n",
            mock_server.uri()
        ),
    )
    .unwrap();

    isolated("data-ingestion", dir.path())
        .env("DATA_SOURCE", "ftp")
        .assert()
        .success()
        .stderr(predicate::str::contains("ftp"));

    assert!(dir.path().join("data/raw/train.csv").exists());
}

#[test]
fn test_ingestion_missing_params_file() {
    let dir = tempdir().unwrap();
    isolated("data-ingestion", dir.path())
        .args(["--params", "missing.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing.yaml"));
}

#[test]
fn test_ingestion_invalid_test_size() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("params.yaml"),
        "data_ingestion:\n  test_size: 1.5\n",
    )
    .unwrap();

    isolated("data-ingestion", dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("test_size"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ingestion_from_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reviews_csv(6, 4)))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("params.yaml"),
        format!(
            "data_ingestion:\n  test_size: 0.2\n  source_url: {}/data.csv\n",
            mock_server.uri()
        ),
    )
    .unwrap();

    isolated("data-ingestion", dir.path())
        .args(["--data-path", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 8 train rows"));

    let test = fs::read_to_string(dir.path().join("out/raw/test.csv")).unwrap();
    assert!(test.starts_with("review,sentiment\n"));
    assert_eq!(test.lines().count(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ingestion_source_unavailable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("params.yaml"),
        format!(
            "data_ingestion:\n  test_size: 0.2\n  source_url: {}/data.csv\n",
            mock_server.uri()
        ),
    )
    .unwrap();

    isolated("data-ingestion", dir.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("HTTP 404"));

    assert!(!dir.path().join("data").exists());
}

#[test]
fn test_register_missing_model_info() {
    let dir = tempdir().unwrap();
    isolated("register-model", dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("experiment_info.json"));
}

#[test]
fn test_register_requires_tracking_uri() {
    let dir = tempdir().unwrap();
    let info = dir.path().join("info.json");
    fs::write(&info, r#"{"run_id": "run-1", "model_path": "model"}"#).unwrap();

    isolated("register-model", dir.path())
        .args(["--model-info", "info.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("MLFLOW_TRACKING_URI"));
}

#[test]
fn test_register_rejects_bad_timeout() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("info.json"),
        r#"{"run_id": "run-1", "model_path": "model"}"#,
    )
    .unwrap();

    isolated("register-model", dir.path())
        .env("MLFLOW_TRACKING_URI", "http://127.0.0.1:5000")
        .env("MLFLOW_HTTP_REQUEST_TIMEOUT", "abc")
        .args(["--model-info", "info.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("MLFLOW_HTTP_REQUEST_TIMEOUT"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_end_to_end() {
    let mock_server = MockServer::start().await;
    let version = json!({
        "model_version": {"name": "sentiment", "version": "2", "current_stage": "None"}
    });
    Mock::given(method("POST"))
        .and(path("/api/2.0/mlflow/model-versions/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(version.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/2.0/mlflow/model-versions/transition-stage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(version))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("reports")).unwrap();
    fs::write(
        dir.path().join("reports/experiment_info.json"),
        r#"{"run_id": "run-1", "model_path": "model"}"#,
    )
    .unwrap();

    isolated("register-model", dir.path())
        .env("MLFLOW_TRACKING_URI", mock_server.uri())
        .args(["--model-name", "sentiment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sentiment version 2"))
        .stderr(predicate::str::contains(
            "model 'sentiment' version 2 registered and moved to Staging",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_unauthorized() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/2.0/mlflow/model-versions/create"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("info.json"),
        r#"{"run_id": "run-1", "model_path": "model"}"#,
    )
    .unwrap();

    isolated("register-model", dir.path())
        .env("MLFLOW_TRACKING_URI", mock_server.uri())
        .env("MLFLOW_TRACKING_USERNAME", "user")
        .env("MLFLOW_TRACKING_PASSWORD", "wrong")
        .args(["--model-info", "info.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unauthorized"));
}
