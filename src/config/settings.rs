//! Application settings and configuration
//!
//! This module provides configuration management for the application,
//! loading settings from environment variables with sensible defaults.
//! Settings are built once at startup and shared read-only afterwards.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Environment variable naming the storage bucket
pub const BUCKET_NAME_VAR: &str = "FIREBASE_BUCKET_NAME";

/// Environment variable naming the configuration object
pub const FILE_NAME_VAR: &str = "FIREBASE_FILE_NAME";

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Bucket and object naming the stored configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageLocation {
    pub bucket: String,
    pub object: String,
}

impl StorageLocation {
    pub fn new(bucket: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.object)
    }
}

/// CORS configuration for the config route
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    // AWS settings
    pub aws_region: String,
    pub s3_endpoint_url: Option<String>,

    // Storage location of the configuration document
    pub storage_bucket: Option<String>,
    pub storage_object: Option<String>,

    // CORS
    pub cors: CorsConfig,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        let settings = Self {
            // App settings
            app_name: env_or_default("APP_NAME", "client-config-service"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: env_or_default("ENVIRONMENT", "development")
                .parse()
                .context("Invalid ENVIRONMENT value")?,
            log_level: env_or_default("LOG_LEVEL", "info"),

            // Server settings
            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", "8080")
                .parse()
                .context("Invalid PORT value")?,

            // AWS settings
            aws_region: env_or_default("AWS_REGION", "us-east-1"),
            s3_endpoint_url: env_non_empty("S3_ENDPOINT_URL"),

            // Storage location
            storage_bucket: env_non_empty(BUCKET_NAME_VAR),
            storage_object: env_non_empty(FILE_NAME_VAR),

            // CORS
            cors: CorsConfig {
                enabled: parse_flag(&env_or_default("CORS_ENABLED", "false"))
                    .context("Invalid CORS_ENABLED value")?,
                allowed_origin: env_or_default("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.cors.enabled {
            HeaderValue::from_str(&self.cors.allowed_origin).with_context(|| {
                format!("Invalid CORS_ALLOWED_ORIGIN value: {:?}", self.cors.allowed_origin)
            })?;

            if self.is_production() && self.cors.allowed_origin.contains("localhost") {
                tracing::warn!(
                    origin = %self.cors.allowed_origin,
                    "Running in production with a localhost CORS origin"
                );
            }
        }

        if self.storage_location().is_none() {
            tracing::warn!(
                "{} or {} is not set; config requests will fail until both are provided",
                BUCKET_NAME_VAR,
                FILE_NAME_VAR
            );
        }

        Ok(())
    }

    /// Resolve the storage location, if both halves are configured
    pub fn storage_location(&self) -> Option<StorageLocation> {
        match (&self.storage_bucket, &self.storage_object) {
            (Some(bucket), Some(object)) => Some(StorageLocation::new(bucket, object)),
            _ => None,
        }
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "client-config-service".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            aws_region: "us-east-1".to_string(),
            s3_endpoint_url: None,
            storage_bucket: None,
            storage_object: None,
            cors: CorsConfig::default(),
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean switch such as `1`, `true`, `yes`, `on` (or their negatives)
fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("Invalid flag: {}. Expected true/false, yes/no, on/off or 1/0", other),
    }
}

/// Environment variable value, treating an empty string as unset
fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
