use crate::api::{ApiClient, http_client};
use crate::endpoint::resolve_endpoint;
use crate::error::Result;
use pages_deploy_core::Credential;
use pages_deploy_core::config::{DEFAULT_ENDPOINTS, DEFAULT_TEMP_PROJECT_PREFIX, Settings};
use std::time::Duration;

/// Status poll cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

/// Tunables for one deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub endpoints: Vec<String>,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
    pub temp_project_prefix: String,
    pub poll: PollPolicy,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            probe_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            temp_project_prefix: DEFAULT_TEMP_PROJECT_PREFIX.to_string(),
            poll: PollPolicy::default(),
        }
    }
}

impl From<&Settings> for DeployOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            endpoints: settings.endpoints.clone(),
            probe_timeout: Duration::from_secs(settings.timeouts.probe_secs),
            request_timeout: Duration::from_secs(settings.timeouts.request_secs),
            temp_project_prefix: settings.temp_project_prefix.clone(),
            poll: PollPolicy {
                interval: settings.poll.interval(),
                max_attempts: settings.poll.max_attempts,
            },
        }
    }
}

/// State owned by a single deployment operation.
///
/// Holds the endpoint that accepted the credential and the temporary project
/// name generated for this run. Never share one across operations.
#[derive(Debug)]
pub struct Session {
    pub(crate) api: ApiClient,
    credential: Credential,
    temp_project_name: String,
    pub(crate) poll: PollPolicy,
}

impl Session {
    /// Resolve the endpoint for `credential` and open a session on it
    pub async fn establish(credential: Credential, options: &DeployOptions) -> Result<Self> {
        let endpoint =
            resolve_endpoint(&credential, &options.endpoints, options.probe_timeout).await?;
        let api = ApiClient::from_parts(
            http_client(&credential)?,
            &endpoint,
            options.request_timeout,
        );

        Ok(Self {
            api,
            credential,
            temp_project_name: temp_project_name(&options.temp_project_prefix),
            poll: options.poll,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.api.base_url()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Name used for storage scoping and project creation when no hint is given
    pub fn temp_project_name(&self) -> &str {
        &self.temp_project_name
    }
}

fn temp_project_name(prefix: &str) -> String {
    format!("{}{}", prefix, chrono::Utc::now().timestamp())
}
