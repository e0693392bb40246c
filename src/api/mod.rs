//! API endpoint handlers module
//!
//! Contains all HTTP endpoint handler implementations.

pub mod config;
pub mod health;
