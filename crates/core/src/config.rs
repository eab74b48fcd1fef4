use crate::error::{Error, Result};
use crate::types::Credential;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Public API endpoints, probed in this order
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://pages-api.cloud.tencent.com/v1",
    "https://pages-api.edgeone.ai/v1",
];

pub const DEFAULT_TEMP_PROJECT_PREFIX: &str = "pages-upload-";

/// Raw TOML configuration structure
/// This matches the config.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawSettings {
    api_token: String,
    project_name: Option<String>,
    endpoints: Option<Vec<String>>,
    temp_project_prefix: Option<String>,
    #[serde(default)]
    poll: PollSettings,
    #[serde(default)]
    timeouts: TimeoutSettings,
}

/// Deployment status polling cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub interval_secs: u64,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            max_attempts: 60,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Per-request network timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub probe_secs: u64,
    pub request_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            probe_secs: 10,
            request_secs: 30,
        }
    }
}

/// Validated settings for a deployment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub api_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub endpoints: Vec<String>,
    pub temp_project_prefix: String,
    pub poll: PollSettings,
    pub timeouts: TimeoutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            project_name: None,
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            temp_project_prefix: DEFAULT_TEMP_PROJECT_PREFIX.to_string(),
            poll: PollSettings::default(),
            timeouts: TimeoutSettings::default(),
        }
    }
}

impl Settings {
    pub fn credential(&self) -> Credential {
        Credential::new(self.api_token.clone(), self.project_name.clone())
    }

    /// Serialize back to TOML for the settings file
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the invariants every later stage relies on
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::ConfigParse(
                "'api_token' must not be empty".to_string(),
            ));
        }

        if self.endpoints.is_empty() {
            return Err(Error::ConfigParse(
                "'endpoints' must list at least one API endpoint".to_string(),
            ));
        }

        for endpoint in &self.endpoints {
            validate_endpoint(endpoint)?;
        }

        if self.poll.max_attempts == 0 {
            return Err(Error::ConfigParse(
                "'poll.max_attempts' must be at least 1".to_string(),
            ));
        }

        if self.timeouts.probe_secs == 0 || self.timeouts.request_secs == 0 {
            return Err(Error::ConfigParse(
                "Timeouts must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse config.toml from a file path
pub fn parse_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let content = fs::read_to_string(path)?;
    parse_settings_str(&content)
}

/// Parse config.toml from a string (useful for testing)
pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(content)?;

    let defaults = Settings::default();
    let settings = Settings {
        api_token: raw.api_token.trim().to_string(),
        project_name: raw
            .project_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        endpoints: raw.endpoints.unwrap_or(defaults.endpoints),
        temp_project_prefix: raw
            .temp_project_prefix
            .unwrap_or(defaults.temp_project_prefix),
        poll: raw.poll,
        timeouts: raw.timeouts,
    };

    settings.validate()?;
    Ok(settings)
}

/// Endpoints are absolute http(s) URLs
fn validate_endpoint(endpoint: &str) -> Result<()> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(Error::ConfigParse("Empty entry in 'endpoints'".to_string()));
    }

    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(Error::ConfigParse(format!(
            "Endpoint '{}' must start with http:// or https://",
            endpoint
        )));
    }

    Ok(())
}
