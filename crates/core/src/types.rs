use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result payload `type` for single-bundle deployments
pub const ZIP_DEPLOYMENT: &str = "zip_deployment";

/// Bearer token plus an optional project-name hint.
///
/// Immutable for the lifetime of one deployment operation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_token: String,
    project_name: Option<String>,
}

impl Credential {
    pub fn new(api_token: impl Into<String>, project_name: Option<String>) -> Self {
        Self {
            api_token: api_token.into(),
            project_name,
        }
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// The project name hint, if one was given and is not blank
    pub fn project_hint(&self) -> Option<&str> {
        self.project_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

// Never print the token itself
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_token", &"***")
            .field("project_name", &self.project_name)
            .finish()
    }
}

/// Target environment of a deployment.
///
/// Only `Production` triggers custom-domain resolution; everything else is
/// served from the preview domain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Preview,
    Other(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Production => "Production",
            Environment::Preview => "Preview",
            Environment::Other(name) => name,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    /// Exact match only; any other spelling is passed through verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Production" => Environment::Production,
            "Preview" => Environment::Preview,
            other => Environment::Other(other.to_string()),
        })
    }
}

impl Serialize for Environment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // Infallible
        Ok(raw.parse().unwrap_or_default())
    }
}

/// Structured result of one deployment operation, handed back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DeployReport {
    pub fn success(url: impl Into<String>, environment: Environment, file_name: &str) -> Self {
        Self {
            success: true,
            url: Some(url.into()),
            environment: Some(environment),
            error: None,
            kind: ZIP_DEPLOYMENT.to_string(),
            message: Some(format!("ZIP file {} deployed successfully", file_name)),
        }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            url: None,
            environment: None,
            error: Some(error.to_string()),
            kind: ZIP_DEPLOYMENT.to_string(),
            message: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            format!(r#"{{"success": {}, "type": "{}"}}"#, self.success, self.kind)
        })
    }
}
