//! Upload transport for bundles.
//!
//! The platform hands out temporary credentials for an S3-compatible bucket;
//! `CosObjectStore` talks to it through `aws-sdk-s3`.

use crate::error::{DeployError, Result};
use crate::model::TempStorageGrant;
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region, RequestChecksumCalculation};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

/// Stores bytes at a key using time-boxed credentials
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, grant: &TempStorageGrant, key: &str, body: Vec<u8>) -> Result<()>;
}

/// Object storage reached at `https://cos.{region}.myqcloud.com`
#[derive(Debug, Clone, Default)]
pub struct CosObjectStore {
    endpoint_override: Option<String>,
}

impl CosObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send uploads to a fixed endpoint instead of the regional one
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint_override: Some(endpoint.into()),
        }
    }

    fn endpoint_for(&self, region: &str) -> String {
        self.endpoint_override
            .clone()
            .unwrap_or_else(|| format!("https://cos.{}.myqcloud.com", region))
    }

    fn client_for(&self, grant: &TempStorageGrant) -> aws_sdk_s3::Client {
        let credentials = Credentials::new(
            grant.credentials.tmp_secret_id.clone(),
            grant.credentials.tmp_secret_key.clone(),
            Some(grant.credentials.token.clone()),
            None,
            "pages-temp-token",
        );

        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(grant.region.clone()))
            .endpoint_url(self.endpoint_for(&grant.region))
            .credentials_provider(credentials)
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build();

        aws_sdk_s3::Client::from_conf(config)
    }
}

#[async_trait]
impl ObjectStore for CosObjectStore {
    async fn put_object(&self, grant: &TempStorageGrant, key: &str, body: Vec<u8>) -> Result<()> {
        let size = body.len();
        self.client_for(grant)
            .put_object()
            .bucket(&grant.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| DeployError::Storage(format!("{}: {}", key, DisplayErrorContext(&e))))?;

        tracing::debug!(bucket = %grant.bucket, key, size, "Uploaded object");
        Ok(())
    }
}
