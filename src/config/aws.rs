//! AWS SDK configuration
//!
//! This module builds the S3 client used to read the configuration object,
//! supporting custom endpoints for S3-compatible stores and local testing.

use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::Client as S3Client;

use crate::config::Settings;

/// AWS configuration builder
///
/// Creates AWS SDK configuration with support for:
/// - Custom regions
/// - Credential providers (environment, instance profile, etc.)
/// - Custom endpoint URLs for S3-compatible stores
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> AwsConfigBuilder<'a> {
    /// Create a new AWS configuration builder
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Build the base AWS SDK configuration
    ///
    /// Region comes from settings, falling back to the default provider
    /// chain; credentials come from the standard chain.
    pub async fn build_sdk_config(&self) -> SdkConfig {
        let region_provider = RegionProviderChain::first_try(Region::new(self.settings.aws_region.clone()))
            .or_default_provider();

        aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await
    }

    /// Create an S3 client with optional custom endpoint
    ///
    /// If `S3_ENDPOINT_URL` is set, the client uses that endpoint with
    /// path-style addressing. SDK retries are disabled: a failed fetch is
    /// reported to the caller as-is.
    pub async fn build_s3_client(&self) -> S3Client {
        let sdk_config = self.build_sdk_config().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .retry_config(RetryConfig::disabled());

        if let Some(endpoint_url) = &self.settings.s3_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom S3 endpoint");

            builder = builder.endpoint_url(endpoint_url).force_path_style(true);
        }

        S3Client::from_conf(builder.build())
    }
}

/// Build AWS SDK config from settings (convenience function)
pub async fn build_aws_config(settings: &Settings) -> SdkConfig {
    AwsConfigBuilder::new(settings).build_sdk_config().await
}

/// Create an S3 client from settings (convenience function)
pub async fn create_s3_client(settings: &Settings) -> S3Client {
    AwsConfigBuilder::new(settings).build_s3_client().await
}
