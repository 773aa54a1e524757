//! Logging for the anime service.
//!
//! Console output plus an optional daily-rolling file written through a
//! non-blocking worker. `RUST_LOG` replaces the computed filter entirely.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    /// Binary name; used for the filter target and the log file prefix
    pub component: String,
    pub default_level: Level,
    pub console: bool,
    pub file: bool,
    /// JSON lines in the log file
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("data/logs"),
            component: "anime-api".to_string(),
            default_level: Level::INFO,
            console: true,
            file: true,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Build from the `[logging]` table; `verbose` forces DEBUG
    pub fn from_settings(
        settings: &LoggingConfig,
        log_dir: impl Into<PathBuf>,
        component: &str,
        verbose: bool,
    ) -> Self {
        Self {
            log_dir: log_dir.into(),
            component: component.to_string(),
            default_level: if verbose {
                Level::DEBUG
            } else {
                parse_level(&settings.default_level)
            },
            console: settings.console,
            file: settings.file,
            json_format: settings.json_format,
        }
    }
}

/// Keeps the file writer flushing; drop it only at shutdown
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber
pub fn init(config: LogConfig) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directives(&config.component, config.default_level))
    });

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.console {
        layers.push(console_layer());
    }

    let mut guard = None;
    if config.file {
        let (layer, worker) = file_layer(&config.log_dir, &config.component, config.json_format)?;
        layers.push(layer);
        guard = Some(worker);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        component = %config.component,
        level = %config.default_level,
        log_dir = %config.log_dir.display(),
        file = config.file,
        "Logging initialized"
    );

    Ok(LogGuard { _file: guard })
}

fn console_layer() -> BoxedLayer {
    fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stdout)
        .boxed()
}

fn file_layer(log_dir: &Path, component: &str, json: bool) -> Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, format!("{}.log", component));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
            .boxed()
    };

    Ok((layer, guard))
}

/// Filter directives used when `RUST_LOG` is not set
fn default_directives(component: &str, level: Level) -> String {
    // Crate targets use underscores even when the binary name has dashes
    let target = component.replace('-', "_");
    format!(
        "{}={},shared={},tower_http={},hyper=warn,reqwest=warn,h2=warn",
        target, level, level, level
    )
}

/// Parse a configured level name, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}
