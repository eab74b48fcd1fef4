use pages_deploy_core::Environment;
use std::fmt;
use std::sync::Arc;

/// Observational events emitted while a deployment runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Started {
        file_name: String,
        environment: Environment,
    },
    EndpointSelected {
        endpoint: String,
    },
    Uploaded {
        key: String,
    },
    ProjectResolved {
        project_id: String,
    },
    DeploymentCreated {
        deployment_id: String,
    },
    Polling {
        attempt: u32,
        max_attempts: u32,
        status: String,
    },
    Completed {
        url: String,
    },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Started {
                file_name,
                environment,
            } => write!(
                f,
                "🚀 Starting deployment of ZIP file: {}\n📋 Environment: {}",
                file_name, environment
            ),
            Progress::EndpointSelected { endpoint } => {
                write!(f, "   ✓ Using API endpoint: {}", endpoint)
            }
            Progress::Uploaded { key } => write!(f, "   ✓ Uploaded bundle to: {}", key),
            Progress::ProjectResolved { project_id } => write!(f, "   ✓ Project: {}", project_id),
            Progress::DeploymentCreated { deployment_id } => {
                write!(f, "   ✓ Deployment created: {}", deployment_id)
            }
            Progress::Polling {
                attempt,
                max_attempts,
                status,
            } => write!(f, "   … Status {} ({}/{})", status, attempt, max_attempts),
            Progress::Completed { url } => {
                write!(f, "✅ Deployment completed successfully!\n🌐 Public URL: {}", url)
            }
        }
    }
}

/// Callback receiving progress events
pub type ProgressFn = dyn Fn(&Progress) + Send + Sync;

/// Shared progress callback
pub type ProgressSink = Arc<ProgressFn>;
