// Platform records as returned inside `Data.Response`

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Domain verification state that marks a custom domain as usable
pub const DOMAIN_VERIFIED: &str = "Pass";

/// Pages project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub project_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub area: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_domains: Vec<CustomDomain>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preset_domain: String,
}

impl Project {
    /// First custom domain that passed verification, in platform order
    pub fn verified_domain(&self) -> Option<&str> {
        self.custom_domains
            .iter()
            .find(|d| d.status == DOMAIN_VERIFIED && !d.domain.is_empty())
            .map(|d| d.domain.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomDomain {
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Deployment state as observed by the poller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DeploymentStatus {
    Process,
    Success,
    /// Any other terminal value, kept verbatim
    Other(String),
}

impl DeploymentStatus {
    pub fn is_processing(&self) -> bool {
        matches!(self, DeploymentStatus::Process)
    }
}

impl From<String> for DeploymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Process" => DeploymentStatus::Process,
            "Success" => DeploymentStatus::Success,
            _ => DeploymentStatus::Other(raw),
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Process => f.write_str("Process"),
            DeploymentStatus::Success => f.write_str("Success"),
            DeploymentStatus::Other(raw) => f.write_str(raw),
        }
    }
}

/// One publish event within a project
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deployment {
    pub deployment_id: String,
    pub status: DeploymentStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preview_url: String,
}

/// Short-lived upload credentials scoped to `target_path` in one bucket.
///
/// Issued for a single project and consumed by a single upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TempStorageGrant {
    pub bucket: String,
    pub region: String,
    pub target_path: String,
    pub credentials: TempCredentials,
}

impl TempStorageGrant {
    /// Object key for a bundle uploaded under this grant
    pub fn object_key(&self, file_name: &str) -> String {
        format!("{}/{}", self.target_path, file_name)
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TempCredentials {
    pub tmp_secret_id: String,
    pub tmp_secret_key: String,
    pub token: String,
}

impl fmt::Debug for TempCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempCredentials")
            .field("tmp_secret_id", &self.tmp_secret_id)
            .finish_non_exhaustive()
    }
}

/// Signed viewing token for a preview domain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncipherToken {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_tolerates_null_collections() {
        let project: Project = serde_json::from_value(json!({
            "ProjectId": "pages-1",
            "Name": "site",
            "CustomDomains": null,
            "PresetDomain": null
        }))
        .unwrap();
        assert!(project.custom_domains.is_empty());
        assert_eq!(project.preset_domain, "");
        assert_eq!(project.verified_domain(), None);
    }

    #[test]
    fn test_verified_domain_first_pass_wins() {
        let project: Project = serde_json::from_value(json!({
            "ProjectId": "pages-1",
            "CustomDomains": [
                {"Domain": "pending.example.com", "Status": "Pending"},
                {"Domain": "a.example.com", "Status": "Pass"},
                {"Domain": "b.example.com", "Status": "Pass"}
            ]
        }))
        .unwrap();
        assert_eq!(project.verified_domain(), Some("a.example.com"));
    }

    #[test]
    fn test_project_requires_id() {
        let result = serde_json::from_value::<Project>(json!({"Name": "site"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_deployment_status_mapping() {
        let status: DeploymentStatus = serde_json::from_value(json!("Process")).unwrap();
        assert!(status.is_processing());
        let status: DeploymentStatus = serde_json::from_value(json!("Success")).unwrap();
        assert_eq!(status, DeploymentStatus::Success);
        let status: DeploymentStatus = serde_json::from_value(json!("Failed")).unwrap();
        assert_eq!(status, DeploymentStatus::Other("Failed".to_string()));
        assert_eq!(status.to_string(), "Failed");
    }

    #[test]
    fn test_object_key_joins_target_path() {
        let grant: TempStorageGrant = serde_json::from_value(json!({
            "Bucket": "b-123",
            "Region": "ap-guangzhou",
            "TargetPath": "uploads/abc",
            "Credentials": {"TmpSecretId": "id", "TmpSecretKey": "hidden-secret", "Token": "hidden-token"}
        }))
        .unwrap();
        assert_eq!(grant.object_key("site.zip"), "uploads/abc/site.zip");
        let debug = format!("{:?}", grant);
        assert!(!debug.contains("hidden-secret"));
        assert!(!debug.contains("hidden-token"));
    }

    #[test]
    fn test_encipher_timestamp_string_or_number() {
        let token: EncipherToken =
            serde_json::from_value(json!({"Token": "abc", "Timestamp": 1700000000})).unwrap();
        assert_eq!(token.timestamp.as_deref(), Some("1700000000"));

        let token: EncipherToken =
            serde_json::from_value(json!({"Token": "abc", "Timestamp": "1700000000"})).unwrap();
        assert_eq!(token.timestamp.as_deref(), Some("1700000000"));

        let token: EncipherToken = serde_json::from_value(json!({"Token": "abc"})).unwrap();
        assert_eq!(token.timestamp, None);
    }
}
