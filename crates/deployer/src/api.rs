//! Pages API client.
//!
//! The platform exposes a single JSON endpoint. Every request body carries an
//! `Action` discriminator and every response is wrapped in
//! `{"Code": 0, "Message": "...", "Data": {"Response": {...}}}`.

use crate::error::{DeployError, Result};
use crate::model::{Deployment, Project};
use pages_deploy_core::Credential;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Distribution type of an uploaded bundle.
///
/// Only `Zip` is ever submitted; `Folder` is accepted by the platform for
/// multi-file uploads, which this client does not perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DistType {
    Zip,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            values: vec![value.to_string()],
        }
    }
}

/// Request body, one variant per platform action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Action")]
pub enum Request {
    /// Cheap listing used to test a credential against an endpoint
    #[serde(rename = "DescribePagesProjects", rename_all = "PascalCase")]
    ProbeProjects { page_number: u32, page_size: u32 },

    #[serde(rename_all = "PascalCase")]
    DescribePagesProjects {
        filters: Vec<Filter>,
        offset: u32,
        limit: u32,
        order_by: String,
    },

    #[serde(rename_all = "PascalCase")]
    DescribePagesCosTempToken {
        #[serde(skip_serializing_if = "Option::is_none")]
        project_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        project_name: Option<String>,
    },

    #[serde(rename_all = "PascalCase")]
    CreatePagesProject {
        name: String,
        provider: String,
        channel: String,
        area: String,
    },

    #[serde(rename_all = "PascalCase")]
    CreatePagesDeployment {
        project_id: String,
        via_meta: String,
        provider: String,
        env: String,
        dist_type: DistType,
        temp_bucket_path: String,
    },

    #[serde(rename_all = "PascalCase")]
    DescribePagesDeployments {
        project_id: String,
        offset: u32,
        limit: u32,
        order_by: String,
        order: String,
    },

    #[serde(rename_all = "PascalCase")]
    DescribePagesEncipherToken { text: String },
}

impl Request {
    pub fn action(&self) -> &'static str {
        match self {
            Request::ProbeProjects { .. } | Request::DescribePagesProjects { .. } => {
                "DescribePagesProjects"
            }
            Request::DescribePagesCosTempToken { .. } => "DescribePagesCosTempToken",
            Request::CreatePagesProject { .. } => "CreatePagesProject",
            Request::CreatePagesDeployment { .. } => "CreatePagesDeployment",
            Request::DescribePagesDeployments { .. } => "DescribePagesDeployments",
            Request::DescribePagesEncipherToken { .. } => "DescribePagesEncipherToken",
        }
    }
}

// Typed `Data.Response` payloads

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectList {
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedProject {
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedDeployment {
    #[serde(default)]
    pub deployment_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentList {
    #[serde(default)]
    pub deployments: Option<Vec<Deployment>>,
}

/// Outer status shared by every response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Status {
    code: i64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope<T> {
    data: Payload<T>,
}

#[derive(Debug, Deserialize)]
struct Payload<T> {
    #[serde(rename = "Response")]
    response: T,
}

/// Check the `Code` and unwrap `Data.Response` into `T`
pub fn decode_envelope<T: DeserializeOwned>(action: &str, body: serde_json::Value) -> Result<T> {
    let status: Status = serde_json::from_value(body.clone())
        .map_err(|e| DeployError::MalformedResponse(format!("{}: {}", action, e)))?;

    if status.code != 0 {
        return Err(DeployError::PlatformApi {
            code: status.code,
            message: status
                .message
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let envelope: Envelope<T> = serde_json::from_value(body)
        .map_err(|e| DeployError::MalformedResponse(format!("{}: {}", action, e)))?;
    Ok(envelope.data.response)
}

/// Authenticated client bound to one API endpoint
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create new API client for `base_url`
    pub fn new(credential: &Credential, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self::from_parts(http_client(credential)?, base_url, timeout))
    }

    pub(crate) fn from_parts(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one action and decode its typed response
    pub async fn call<T: DeserializeOwned>(&self, request: &Request) -> Result<T> {
        tracing::debug!(action = request.action(), endpoint = %self.base_url, "API request");

        let response = self
            .client
            .post(&self.base_url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(DeployError::HttpStatus {
                action: request.action(),
                status: status.as_u16(),
                body: text,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DeployError::MalformedResponse(format!("{}: {}", request.action(), e)))?;

        decode_envelope(request.action(), body)
    }
}

/// Build a reqwest client carrying the bearer credential
pub(crate) fn http_client(credential: &Credential) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", credential.api_token()))
        .map_err(|_| DeployError::Authentication)?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_serializes_as_describe_projects() {
        let body = serde_json::to_value(Request::ProbeProjects {
            page_number: 1,
            page_size: 10,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"Action": "DescribePagesProjects", "PageNumber": 1, "PageSize": 10})
        );
    }

    #[test]
    fn test_create_deployment_body() {
        let body = serde_json::to_value(Request::CreatePagesDeployment {
            project_id: "pages-1".into(),
            via_meta: "Upload".into(),
            provider: "Upload".into(),
            env: "Preview".into(),
            dist_type: DistType::Zip,
            temp_bucket_path: "uploads/abc/site.zip".into(),
        })
        .unwrap();
        assert_eq!(body["Action"], "CreatePagesDeployment");
        assert_eq!(body["ProjectId"], "pages-1");
        assert_eq!(body["DistType"], "Zip");
        assert_eq!(body["Env"], "Preview");
        assert_eq!(body["TempBucketPath"], "uploads/abc/site.zip");
    }

    #[test]
    fn test_temp_token_body_omits_absent_scope() {
        let body = serde_json::to_value(Request::DescribePagesCosTempToken {
            project_id: None,
            project_name: Some("pages-upload-1".into()),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"Action": "DescribePagesCosTempToken", "ProjectName": "pages-upload-1"})
        );
    }

    #[test]
    fn test_filters_serialize_pascal_case() {
        let body = serde_json::to_value(Request::DescribePagesProjects {
            filters: vec![Filter::new("Name", "site")],
            offset: 0,
            limit: 10,
            order_by: "CreatedOn".into(),
        })
        .unwrap();
        assert_eq!(body["Filters"], json!([{"Name": "Name", "Values": ["site"]}]));
        assert_eq!(body["OrderBy"], "CreatedOn");
    }

    #[test]
    fn test_decode_success_envelope() {
        let created: CreatedProject = decode_envelope(
            "CreatePagesProject",
            json!({"Code": 0, "Data": {"Response": {"ProjectId": "pages-9"}}}),
        )
        .unwrap();
        assert_eq!(created.project_id.as_deref(), Some("pages-9"));
    }

    #[test]
    fn test_decode_error_code() {
        let result: Result<CreatedProject> = decode_envelope(
            "CreatePagesProject",
            json!({"Code": 4001, "Message": "quota exceeded"}),
        );
        match result {
            Err(DeployError::PlatformApi { code, message }) => {
                assert_eq!(code, 4001);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_data_is_malformed() {
        let result: Result<CreatedProject> =
            decode_envelope("CreatePagesProject", json!({"Code": 0}));
        assert!(matches!(result, Err(DeployError::MalformedResponse(_))));

        let result: Result<CreatedProject> =
            decode_envelope("CreatePagesProject", json!({"Message": "no code"}));
        assert!(matches!(result, Err(DeployError::MalformedResponse(_))));
    }
}
