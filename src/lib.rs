//! Client config service library
//!
//! Serves client SDK configuration stored in object storage, and seals the
//! same configuration into portable AES-256-GCM blobs.

// Public modules
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use error::ApiError;
pub use schemas::ClientConfig;
pub use server::App;
