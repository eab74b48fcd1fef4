// Endpoint selection: the first candidate that accepts the credential wins

use crate::api::{ApiClient, Request, http_client};
use crate::error::{DeployError, Result};
use pages_deploy_core::Credential;
use serde::de::IgnoredAny;
use std::time::Duration;

/// Probe `candidates` in order and return the first one answering `Code: 0`.
///
/// Transport failures, non-200 statuses, malformed bodies and non-zero codes
/// all count as a rejected candidate.
pub async fn resolve_endpoint(
    credential: &Credential,
    candidates: &[String],
    probe_timeout: Duration,
) -> Result<String> {
    let client = http_client(credential)?;
    let probe = Request::ProbeProjects {
        page_number: 1,
        page_size: 10,
    };

    for candidate in candidates {
        let api = ApiClient::from_parts(client.clone(), candidate, probe_timeout);
        match api.call::<IgnoredAny>(&probe).await {
            Ok(_) => {
                tracing::info!(endpoint = %candidate, "Selected API endpoint");
                return Ok(candidate.clone());
            }
            Err(e) => {
                tracing::warn!(endpoint = %candidate, error = %e, "Endpoint rejected credential");
            }
        }
    }

    Err(DeployError::Authentication)
}
