// Public URL for a finished deployment

use crate::api::Request;
use crate::error::{DeployError, Result};
use crate::model::{Deployment, DeploymentStatus, EncipherToken};
use crate::session::Session;
use pages_deploy_core::Environment;

impl Session {
    /// Derive the externally visible URL of a successful deployment.
    ///
    /// Production prefers the first verified custom domain. Otherwise the
    /// preview (or preset) domain is returned with a signed access token.
    pub async fn resolve_url(
        &self,
        deployment: &Deployment,
        project_id: &str,
        environment: &Environment,
    ) -> Result<String> {
        if deployment.status != DeploymentStatus::Success {
            return Err(DeployError::DeploymentFailed(deployment.status.to_string()));
        }

        let project = self
            .find_project_by_id(project_id)
            .await?
            .ok_or_else(|| DeployError::ProjectLookup(project_id.to_string()))?;

        if environment.is_production() {
            if let Some(domain) = project.verified_domain() {
                return Ok(format!("https://{}", domain));
            }
        }

        let domain = preview_domain(&deployment.preview_url, &project.preset_domain)
            .ok_or(DeployError::NoDomain)?;

        let (token, timestamp) = self.encipher_token(&domain).await?;
        Ok(signed_url(&domain, &token, &timestamp))
    }

    /// Signed token granting temporary access to `domain`
    async fn encipher_token(&self, domain: &str) -> Result<(String, String)> {
        let request = Request::DescribePagesEncipherToken {
            text: domain.to_string(),
        };
        let response: EncipherToken = self.api.call(&request).await.map_err(|e| match e {
            DeployError::PlatformApi { message, .. } => DeployError::TokenAcquisition {
                what: "access token",
                message,
            },
            other => other,
        })?;

        match (response.token, response.timestamp) {
            (Some(token), Some(timestamp)) if !token.is_empty() => Ok((token, timestamp)),
            _ => Err(DeployError::TokenAcquisition {
                what: "access token",
                message: format!("no token returned for {}", domain),
            }),
        }
    }
}

/// Host part of the preview URL, falling back to the preset domain
fn preview_domain(preview_url: &str, preset_domain: &str) -> Option<String> {
    let from_preview = preview_url.replace("https://", "");
    let domain = if from_preview.is_empty() {
        preset_domain
    } else {
        from_preview.as_str()
    };

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

fn signed_url(domain: &str, token: &str, timestamp: &str) -> String {
    format!("https://{}?eo_token={}&eo_time={}", domain, token, timestamp)
}
