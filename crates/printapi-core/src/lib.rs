//! Core types for the Print API client.
//!
//! This crate provides the pieces that need no network access:
//! - [`Environment`] and [`ApiVersion`] with their base-URI mapping
//! - [`ClientConfig`] for building clients from code or YAML
//! - [`ConfigError`] for configuration failures

pub mod config;
pub mod environment;
pub mod errors;

pub use config::ClientConfig;
pub use environment::{ApiVersion, Environment};
pub use errors::ConfigError;
