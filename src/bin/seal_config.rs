//! CLI tool to seal the client config into an encrypted, portable string
//!
//! Reads the FIREBASE_* variables and a raw 32-byte key, and prints
//! `base64(nonce || AES-256-GCM ciphertext)` to stdout.
//!
//! Usage:
//!   CONFIG_ENCRYPTION_KEY=... cargo run --bin seal_config
//!   CONFIG_ENCRYPTION_KEY=... cargo run --bin seal_config -- --open <BLOB>

use anyhow::{Context, Result};
use clap::Parser;
use client_config_service::services::config_sealer::{
    key_from_lookup, seal_from_env, ConfigSealer, DEFAULT_KEY_VAR,
};
use tracing_subscriber::EnvFilter;

/// Seal the client config held in environment variables
#[derive(Parser, Debug)]
#[command(name = "seal_config")]
#[command(about = "Seal the client config from environment variables with AES-256-GCM")]
struct Args {
    /// Environment variable holding the raw 32-byte key
    #[arg(long, default_value = DEFAULT_KEY_VAR)]
    key_env: String,

    /// Decrypt a sealed blob and print the JSON config instead of sealing
    #[arg(long, value_name = "BLOB")]
    open: Option<String>,
}

fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    // Diagnostics go to stderr; stdout carries only the result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match args.open {
        Some(blob) => {
            let key = key_from_lookup(&|name: &str| std::env::var_os(name), &args.key_env)?;
            let config = ConfigSealer::from_key_bytes(&key)?
                .open(&blob)
                .context("Failed to open sealed config")?;

            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            let sealed = seal_from_env(&args.key_env).context("Failed to seal config")?;
            tracing::debug!(length = sealed.len(), "Config sealed");

            println!("{}", sealed);
        }
    }

    Ok(())
}
