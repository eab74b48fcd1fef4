#![allow(dead_code)]

use async_trait::async_trait;
use httpmock::prelude::*;
use pages_deploy_deployer::{DeployOptions, ObjectStore, PollPolicy, Result, TempStorageGrant};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub const API_PATH: &str = "/v1";
pub const TARGET_PATH: &str = "uploads/abc";

/// In-memory store recording every upload
#[derive(Default)]
pub struct RecordingStore {
    pub uploads: Mutex<Vec<Upload>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
}

impl RecordingStore {
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_object(&self, grant: &TempStorageGrant, key: &str, body: Vec<u8>) -> Result<()> {
        self.uploads.lock().unwrap().push(Upload {
            bucket: grant.bucket.clone(),
            key: key.to_string(),
            body,
        });
        Ok(())
    }
}

/// Options pointing at `endpoints` with a fast poll
pub fn options(endpoints: Vec<String>) -> DeployOptions {
    DeployOptions {
        endpoints,
        probe_timeout: Duration::from_secs(5),
        request_timeout: Duration::from_secs(5),
        temp_project_prefix: "test-upload-".to_string(),
        poll: PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts: 5,
        },
    }
}

pub fn write_bundle(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"PK\x03\x04 fake zip").unwrap();
    path
}

/// Wrap `response` in a successful envelope
pub fn ok(response: Value) -> Value {
    json!({"Code": 0, "Message": "", "Data": {"Response": response}})
}

pub fn api_error(code: i64, message: &str) -> Value {
    json!({"Code": code, "Message": message})
}

pub fn grant() -> Value {
    json!({
        "Bucket": "pages-bucket-1250000000",
        "Region": "ap-guangzhou",
        "TargetPath": TARGET_PATH,
        "Credentials": {
            "TmpSecretId": "tmp-id",
            "TmpSecretKey": "tmp-key",
            "Token": "tmp-session"
        }
    })
}

pub async fn mock_probe_ok(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(API_PATH)
                .json_body_partial(r#"{"Action": "DescribePagesProjects", "PageNumber": 1}"#);
            then.status(200)
                .json_body(ok(json!({"Projects": [], "TotalCount": 0})));
        })
        .await
}

pub async fn mock_projects_by_name<'a>(
    server: &'a MockServer,
    name: &str,
    projects: Value,
) -> httpmock::Mock<'a> {
    let filter = json!({
        "Action": "DescribePagesProjects",
        "Filters": [{"Name": "Name", "Values": [name]}]
    });
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(API_PATH)
                .json_body_partial(filter.to_string());
            then.status(200).json_body(ok(json!({"Projects": projects})));
        })
        .await
}

pub async fn mock_project_by_id<'a>(
    server: &'a MockServer,
    project_id: &str,
    projects: Value,
) -> httpmock::Mock<'a> {
    let filter = json!({
        "Action": "DescribePagesProjects",
        "Filters": [{"Name": "ProjectId", "Values": [project_id]}]
    });
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(API_PATH)
                .json_body_partial(filter.to_string());
            then.status(200).json_body(ok(json!({"Projects": projects})));
        })
        .await
}

pub async fn mock_action<'a>(
    server: &'a MockServer,
    action: &str,
    body: Value,
) -> httpmock::Mock<'a> {
    let partial = json!({"Action": action});
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(API_PATH)
                .json_body_partial(partial.to_string());
            then.status(200).json_body(body);
        })
        .await
}

pub async fn mock_deployments<'a>(
    server: &'a MockServer,
    deployments: Value,
) -> httpmock::Mock<'a> {
    mock_action(
        server,
        "DescribePagesDeployments",
        ok(json!({"Deployments": deployments, "TotalCount": 1})),
    )
    .await
}
