//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - YAML write-back of the resolved configuration

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
