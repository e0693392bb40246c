//! Config fetcher
//!
//! Reads the client configuration document from object storage and decodes
//! it into a [`ClientConfig`]. The HTTP layer only sees the [`ConfigSource`]
//! trait; [`S3ConfigFetcher`] is the production implementation.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as S3Client;
use thiserror::Error;

use crate::config::StorageLocation;
use crate::schemas::ClientConfig;

/// Errors raised while fetching the configuration document.
///
/// Every variant is a "fetch failed" condition; the variant only records
/// which stage failed. The payload is the underlying cause message.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The storage request could not be sent or was rejected
    /// (connection failure, missing bucket/object, access denied)
    #[error("failed to open object: {0}")]
    Open(String),

    /// The object body stream failed mid-read
    #[error("failed to read object: {0}")]
    Read(String),

    /// The object is not a valid configuration document
    #[error("failed to parse config JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A place the client configuration can be fetched from
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch and decode the configuration stored at `location`
    async fn fetch(&self, location: &StorageLocation) -> Result<ClientConfig, FetchError>;
}

/// Fetches the configuration document from an S3-compatible bucket.
#[derive(Clone)]
pub struct S3ConfigFetcher {
    /// AWS S3 SDK client
    client: S3Client,
}

impl S3ConfigFetcher {
    /// Create a new fetcher around an S3 SDK client
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigSource for S3ConfigFetcher {
    async fn fetch(&self, location: &StorageLocation) -> Result<ClientConfig, FetchError> {
        tracing::debug!(
            bucket = %location.bucket,
            object = %location.object,
            "Fetching client config"
        );

        let output = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.object)
            .send()
            .await
            .map_err(|e| FetchError::Open(DisplayErrorContext(&e).to_string()))?;

        // The body stream is consumed here and released on every path below.
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| FetchError::Read(e.to_string()))?
            .into_bytes();

        let config: ClientConfig = serde_json::from_slice(&bytes)?;

        tracing::debug!(
            bucket = %location.bucket,
            object = %location.object,
            size = bytes.len(),
            "Client config fetched"
        );

        Ok(config)
    }
}
