//! Deploys a zipped static site to a Pages hosting platform.
//!
//! One deployment runs four stages against a fresh [`Session`]: endpoint
//! selection, project resolution, upload and polling, and URL resolution.

pub mod api;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod progress;
pub mod project;
pub mod session;
pub mod storage;
pub mod url;

use async_trait::async_trait;
use pages_deploy_core::{Credential, DeployReport, Environment};
use std::path::Path;
use std::sync::Arc;

pub use error::{DeployError, Result};
pub use model::{Deployment, DeploymentStatus, Project, TempStorageGrant};
pub use orchestrator::{DeploymentRecord, validate_artifact};
pub use progress::{Progress, ProgressSink};
pub use session::{DeployOptions, PollPolicy, Session};
pub use storage::{CosObjectStore, ObjectStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    pub site_url: String,
    pub environment: Environment,
    pub project_id: String,
    pub deployment_id: String,
}

#[async_trait]
pub trait Deployer {
    async fn deploy(&self, bundle: &Path, environment: &Environment) -> Result<DeploymentResult>;
}

/// Deploys bundles with one credential, opening a new session per call
pub struct PagesDeployer {
    credential: Credential,
    options: DeployOptions,
    store: Arc<dyn ObjectStore>,
    progress: Option<ProgressSink>,
}

impl PagesDeployer {
    pub fn new(
        credential: Credential,
        options: DeployOptions,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            credential,
            options,
            store,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Deploy and fold the outcome into the host-facing result payload
    pub async fn deploy_report(&self, bundle: &Path, environment: &Environment) -> DeployReport {
        let file_name = bundle
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match self.deploy(bundle, environment).await {
            Ok(result) => DeployReport::success(result.site_url, result.environment, &file_name),
            Err(e) => {
                tracing::error!(error = %e, "Deployment failed");
                DeployReport::failure(e)
            }
        }
    }

    fn emit(&self, event: &Progress) {
        if let Some(sink) = &self.progress {
            sink(event);
        }
    }
}

#[async_trait]
impl Deployer for PagesDeployer {
    async fn deploy(&self, bundle: &Path, environment: &Environment) -> Result<DeploymentResult> {
        let file_name = validate_artifact(bundle)?;
        self.emit(&Progress::Started {
            file_name,
            environment: environment.clone(),
        });

        let session = Session::establish(self.credential.clone(), &self.options).await?;
        self.emit(&Progress::EndpointSelected {
            endpoint: session.endpoint().to_string(),
        });

        let on_progress = |event: &Progress| self.emit(event);
        let record = session
            .run_deployment(self.store.as_ref(), bundle, environment, &on_progress)
            .await?;

        let site_url = session
            .resolve_url(&record.deployment, &record.project_id, environment)
            .await?;
        self.emit(&Progress::Completed {
            url: site_url.clone(),
        });

        Ok(DeploymentResult {
            site_url,
            environment: environment.clone(),
            project_id: record.project_id,
            deployment_id: record.deployment.deployment_id,
        })
    }
}
