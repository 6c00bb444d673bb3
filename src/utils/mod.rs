//! Configuration utilities.

/// TOML + environment configuration loading.
pub mod config;

pub use config::PapiConfig;
