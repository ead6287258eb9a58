//! Core module - configuration and CLI surface
//!
//! - [`Config`] - resolved runtime configuration
//! - [`Args`] - command line flags
//! - [`BackendConfig`] - `ODOO_*` connection settings

pub mod config;

pub use config::{Args, BackendConfig, Config, ConfigError};
