//! Schema module
//!
//! Contains the serde models exchanged with object storage and HTTP clients.

pub mod client_config;

pub use client_config::{ClientConfig, CONFIG_ENV_VARS};
