//! Application state container
//!
//! This module defines the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::{create_s3_client, Settings};
use crate::middleware::CorsHeaders;
use crate::services::{ConfigSource, S3ConfigFetcher};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
///
/// Everything here is immutable after startup and cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Where client configuration is fetched from
    pub config_source: Arc<dyn ConfigSource>,

    /// CORS headers for the config route, when CORS is enabled
    pub cors: Option<CorsHeaders>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state backed by S3
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        tracing::debug!(
            region = %settings.aws_region,
            s3_endpoint = ?settings.s3_endpoint_url,
            "Initializing S3 client"
        );

        let s3_client = create_s3_client(&settings).await;
        let source = Arc::new(S3ConfigFetcher::new(s3_client));

        Self::with_source(settings, source)
    }

    /// Create application state around an arbitrary config source
    pub fn with_source(settings: Settings, config_source: Arc<dyn ConfigSource>) -> anyhow::Result<Self> {
        let cors = if settings.cors.enabled {
            tracing::info!(origin = %settings.cors.allowed_origin, "CORS enabled for config route");
            Some(CorsHeaders::new(&settings.cors.allowed_origin)?)
        } else {
            tracing::debug!("CORS disabled");
            None
        };

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            settings: Arc::new(settings),
            config_source,
            cors,
            start_time: Instant::now(),
        })
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if both halves of the storage location are configured
    pub fn has_storage_location(&self) -> bool {
        self.settings.storage_location().is_some()
    }
}
