// Upload, register and wait for a deployment

use crate::api::{CreatedDeployment, DeploymentList, DistType, Request};
use crate::error::{DeployError, Result};
use crate::model::{Deployment, TempStorageGrant};
use crate::progress::Progress;
use crate::session::Session;
use crate::storage::ObjectStore;
use pages_deploy_core::Environment;
use std::path::Path;
use std::time::Duration;

const DEPLOYMENT_PAGE_SIZE: u32 = 50;

/// Terminal deployment as seen by the poller, with the project it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub project_id: String,
    pub deployment: Deployment,
}

/// Accept only `.zip` bundles and return the bundle's file name.
///
/// Runs before any network traffic.
pub fn validate_artifact(bundle: &Path) -> Result<String> {
    let file_name = bundle
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| DeployError::UnsupportedArtifact(bundle.display().to_string()))?;

    if !file_name.to_ascii_lowercase().ends_with(".zip") {
        return Err(DeployError::UnsupportedArtifact(file_name.to_string()));
    }

    if !bundle.is_file() {
        return Err(DeployError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Bundle not found: {}", bundle.display()),
        )));
    }

    Ok(file_name.to_string())
}

impl Session {
    /// Upload the bundle under the grant's target path and return its key
    pub async fn upload_bundle(
        &self,
        store: &dyn ObjectStore,
        grant: TempStorageGrant,
        bundle: &Path,
        file_name: &str,
    ) -> Result<String> {
        let key = grant.object_key(file_name);
        let body = tokio::fs::read(bundle).await?;

        tracing::info!(bucket = %grant.bucket, key = %key, bytes = body.len(), "Uploading bundle");
        store.put_object(&grant, &key, body).await?;
        Ok(key)
    }

    /// Register a zip deployment of the uploaded key
    pub async fn create_deployment(
        &self,
        project_id: &str,
        temp_bucket_path: &str,
        environment: &Environment,
    ) -> Result<String> {
        let request = Request::CreatePagesDeployment {
            project_id: project_id.to_string(),
            via_meta: "Upload".to_string(),
            provider: "Upload".to_string(),
            env: environment.to_string(),
            dist_type: DistType::Zip,
            temp_bucket_path: temp_bucket_path.to_string(),
        };

        let created: CreatedDeployment = self.api.call(&request).await?;
        created
            .deployment_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DeployError::DeploymentCreation(project_id.to_string()))
    }

    /// Latest state of one deployment, looked up in the newest page
    pub async fn fetch_deployment(
        &self,
        project_id: &str,
        deployment_id: &str,
    ) -> Result<Deployment> {
        let request = Request::DescribePagesDeployments {
            project_id: project_id.to_string(),
            offset: 0,
            limit: DEPLOYMENT_PAGE_SIZE,
            order_by: "CreatedOn".to_string(),
            order: "Desc".to_string(),
        };

        let list: DeploymentList = self.api.call(&request).await?;
        list.deployments
            .unwrap_or_default()
            .into_iter()
            .find(|d| d.deployment_id == deployment_id)
            .ok_or_else(|| DeployError::DeploymentNotFound(deployment_id.to_string()))
    }

    /// Poll until the deployment leaves `Process`.
    ///
    /// Does not judge success; any non-`Process` status ends the wait.
    pub async fn wait_for_deployment(
        &self,
        project_id: &str,
        deployment_id: &str,
        on_progress: &(dyn Fn(&Progress) + Send + Sync + '_),
    ) -> Result<Deployment> {
        let max_attempts = self.poll.max_attempts;
        let pause = self.poll.interval.max(Duration::from_millis(1));

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::time::sleep(pause).await;
            }

            let deployment = self.fetch_deployment(project_id, deployment_id).await?;
            tracing::debug!(
                deployment_id,
                attempt,
                status = %deployment.status,
                "Polled deployment"
            );
            on_progress(&Progress::Polling {
                attempt,
                max_attempts,
                status: deployment.status.to_string(),
            });

            if !deployment.status.is_processing() {
                return Ok(deployment);
            }
        }

        Err(DeployError::DeploymentTimeout {
            deployment_id: deployment_id.to_string(),
            attempts: max_attempts,
        })
    }

    /// Run the whole deployment stage: grant, upload, project, register, poll
    pub async fn run_deployment(
        &self,
        store: &dyn ObjectStore,
        bundle: &Path,
        environment: &Environment,
        on_progress: &(dyn Fn(&Progress) + Send + Sync + '_),
    ) -> Result<DeploymentRecord> {
        let file_name = validate_artifact(bundle)?;
        let hint = self.credential().project_hint();

        let grant = self.temp_storage_grant(hint).await?;
        let key = self.upload_bundle(store, grant, bundle, &file_name).await?;
        on_progress(&Progress::Uploaded { key: key.clone() });

        let project_id = self.resolve_or_create_project(hint).await?;
        on_progress(&Progress::ProjectResolved {
            project_id: project_id.clone(),
        });

        let deployment_id = self.create_deployment(&project_id, &key, environment).await?;
        tracing::info!(
            project_id = %project_id,
            deployment_id = %deployment_id,
            "Deployment created"
        );
        on_progress(&Progress::DeploymentCreated {
            deployment_id: deployment_id.clone(),
        });

        let deployment = self
            .wait_for_deployment(&project_id, &deployment_id, on_progress)
            .await?;

        Ok(DeploymentRecord {
            project_id,
            deployment,
        })
    }
}
