//! Services module
//!
//! Contains the config fetcher and the config sealer.

pub mod config_fetcher;
pub mod config_sealer;

pub use config_fetcher::{ConfigSource, FetchError, S3ConfigFetcher};
pub use config_sealer::{seal_from_env, seal_from_lookup, ConfigSealer, SealError};
