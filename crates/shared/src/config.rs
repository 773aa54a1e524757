//! Configuration management for the anime service.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings and environment overrides for
//! deployment-specific values (port, credentials, upstream URLs).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Database settings
    pub database: DatabaseConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Jikan (metadata source) settings
    pub jikan: JikanConfig,

    /// Trailer lookup settings
    #[serde(default)]
    pub trailers: TrailerConfig,

    /// Top-airing pipeline settings
    #[serde(default)]
    pub airing: AiringConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path (relative to data directory or absolute)
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Jikan API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum retries for failed requests
    pub max_retries: u32,

    /// Retry delay in milliseconds
    pub retry_delay_ms: u64,

    /// Page size requested from the current-season endpoint
    pub seasonal_page_size: u32,

    /// Result limit for free-text search
    pub search_limit: u32,

    /// Result limit for the trending list
    pub trending_limit: u32,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub requests_per_second: f64,

    /// Maximum requests per minute
    pub requests_per_minute: u32,
}

/// Trailer lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailerConfig {
    /// AniList GraphQL endpoint
    pub anilist_url: String,

    /// YouTube Data API base URL
    pub youtube_base_url: String,

    /// YouTube Data API key; keyword search is disabled without it
    #[serde(default)]
    pub youtube_api_key: Option<String>,

    /// Timeout for each network lookup in seconds
    pub lookup_timeout_seconds: u64,
}

/// Top-airing pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiringConfig {
    /// Cache key for the shared top-airing result set
    pub cache_key: String,

    /// Cache time-to-live in seconds
    pub ttl_seconds: u64,

    /// Pause after each trailer lookup in milliseconds
    pub enrichment_delay_ms: u64,

    /// Number of entries kept from the seasonal list
    pub top_n: usize,
}

impl Default for TrailerConfig {
    fn default() -> Self {
        Self {
            anilist_url: "https://graphql.anilist.co".to_string(),
            youtube_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            youtube_api_key: None,
            lookup_timeout_seconds: 5,
        }
    }
}

impl Default for AiringConfig {
    fn default() -> Self {
        Self {
            cache_key: "top_airing_anime".to_string(),
            ttl_seconds: 2 * 60 * 60,
            enrichment_delay_ms: 200,
            top_n: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:3001".to_string(),
                    "https://animegalaxy.vercel.app".to_string(),
                ],
            },
            database: DatabaseConfig {
                path: "anime.db".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            jikan: JikanConfig {
                base_url: "https://api.jikan.moe/v4".to_string(),
                rate_limit: RateLimitConfig {
                    requests_per_second: 3.0,
                    requests_per_minute: 60,
                },
                timeout_seconds: 10,
                max_retries: 0,
                retry_delay_ms: 1000,
                seasonal_page_size: 25,
                search_limit: 20,
                trending_limit: 10,
            },
            trailers: TrailerConfig::default(),
            airing: AiringConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a TOML file or create default if not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(url) = lookup("JIKAN_BASE_URL") {
            self.jikan.base_url = url;
        }
        if let Some(url) = lookup("ANILIST_URL") {
            self.trailers.anilist_url = url;
        }
        if let Some(key) = lookup("YOUTUBE_API_KEY") {
            self.trailers.youtube_api_key = Some(key);
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the database file
    pub fn database_path(&self) -> PathBuf {
        let db_path = Path::new(&self.database.path);
        if db_path.is_absolute() {
            db_path.to_path_buf()
        } else {
            self.data_dir().join(db_path)
        }
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }

    /// YouTube key, treating a blank value as unset
    pub fn youtube_api_key(&self) -> Option<&str> {
        self.trailers
            .youtube_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.trailers.lookup_timeout_seconds)
    }
}
