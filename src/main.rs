//! Client Config Service
//!
//! Serves the client SDK configuration stored in object storage over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use client_config_service::{
    config::{Environment, Settings},
    logging::SizeBasedRollingWriter,
    server::App,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Client Config Service
///
/// Serves client SDK configuration from object storage at GET /app/get-config.
#[derive(Parser, Debug)]
#[command(name = "client-config-service")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides HOST env var)
    #[arg(long)]
    host: Option<String>,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long)]
    log_level: Option<String>,

    /// Environment: dev, staging, prod (overrides ENVIRONMENT env var)
    #[arg(short, long)]
    env: Option<Environment>,

    /// Enable CORS headers on the config route (overrides CORS_ENABLED env var)
    #[arg(long)]
    cors: bool,

    /// Allowed CORS origin (overrides CORS_ALLOWED_ORIGIN env var, implies --cors)
    #[arg(long)]
    cors_origin: Option<String>,

    /// Log file path for JSON logs (enables file logging with 10MB rotation)
    /// Example: --log-file /var/log/client-config/app.log
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (before logging, so we can use log_level)
    let mut settings = Settings::load()?;

    // Override settings with CLI arguments
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(env) = args.env {
        settings.environment = env;
    }
    if args.cors {
        settings.cors.enabled = true;
    }
    if let Some(origin) = args.cors_origin {
        settings.cors.enabled = true;
        settings.cors.allowed_origin = origin;
    }

    init_tracing(&settings.log_level, args.log_file.as_ref())?;

    // CLI overrides may have changed validated fields
    settings.validate()?;

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        host = %settings.host,
        port = %settings.port,
        cors_enabled = settings.cors.enabled,
        storage_location = %settings
            .storage_location()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string()),
        "Starting application"
    );

    let app = App::new(settings).await?;

    app.run_with_graceful_shutdown().await?;

    tracing::info!("Application shutdown complete");

    Ok(())
}

/// Initialize tracing subscriber with the specified log level
/// Optionally writes to a rolling log file as well
fn init_tracing(log_level: &str, log_file: Option<&PathBuf>) -> Result<()> {
    // Build filter from RUST_LOG env var or use provided log level
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Console layer - always enabled, JSON format
    let console_layer = fmt::layer().json().with_filter(filter());

    let subscriber = tracing_subscriber::registry().with(console_layer);

    if let Some(path) = log_file {
        let file_writer = SizeBasedRollingWriter::with_defaults(path)
            .with_context(|| format!("Failed to create log file writer at {}", path.display()))?;

        let file_layer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(file_writer)
            .with_filter(filter());

        subscriber.with(file_layer).init();

        eprintln!("Logging to file: {} (10MB rotation, max 5 files)", path.display());
    } else {
        subscriber.init();
    }

    Ok(())
}
