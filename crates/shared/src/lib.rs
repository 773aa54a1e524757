//! Shared library for the anime service.
//!
//! This crate provides common functionality used by the service crate:
//! - Configuration management
//! - Database connection and schema
//! - Domain models
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
