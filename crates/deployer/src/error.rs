use thiserror::Error;

/// Every way a deployment operation can fail.
///
/// All variants are terminal for the current operation.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Invalid API token. Please check your Pages API token.")]
    Authentication,

    #[error("Project {0} not found")]
    ProjectNotFound(String),

    #[error("Failed to create project {0}")]
    ProjectCreation(String),

    #[error("Failed to get {what}: {message}")]
    TokenAcquisition { what: &'static str, message: String },

    #[error("Only ZIP files are supported, got {0}")]
    UnsupportedArtifact(String),

    #[error("Failed to create deployment for project {0}")]
    DeploymentCreation(String),

    #[error("Deployment {0} not found")]
    DeploymentNotFound(String),

    #[error("Deployment {deployment_id} timed out after {attempts} status checks")]
    DeploymentTimeout { deployment_id: String, attempts: u32 },

    #[error("Deployment failed with status: {0}")]
    DeploymentFailed(String),

    #[error("Failed to get details of project {0}")]
    ProjectLookup(String),

    #[error("Failed to get deployment domain")]
    NoDomain,

    #[error("API error (code {code}): {message}")]
    PlatformApi { code: i64, message: String },

    #[error("{action} returned HTTP {status}: {body}")]
    HttpStatus {
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upload failed: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeployError>;
