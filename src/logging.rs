//! Logging setup for the bridge and its hosts
//!
//! Built on `tracing`. Lifecycle events (handle acquire/release, projection,
//! registry insert/forget, failure translation) are emitted at `trace` and
//! `debug` with structured fields; nothing is printed unless a host installs
//! a subscriber through [`init_logging`].

use crate::config::LoggingConfig;
use std::path::Path;
use std::str::FromStr;
use tracing::Level;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

pub const ENV_LOG_LEVEL: &str = "OTIO_BRIDGE_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "OTIO_BRIDGE_LOG_JSON";
pub const ENV_LOG_FILE: &str = "OTIO_BRIDGE_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with timestamps
    Pretty,
    /// Compact format for production
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// File with daily rotation
    File { directory: String, prefix: String },
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Whether to include span enter/close events
    pub span_events: bool,
    /// Extra filter directives (e.g., "otio_bridge=trace,otio_native=debug")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Settings from the `[logging]` section of a bridge config
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut log = Self::new().with_level(parse_level(&config.level).unwrap_or(Level::INFO));
        if config.json {
            log = log.with_format(LogFormat::Json);
        }
        if let Some(directory) = &config.directory {
            log = log.with_output(LogOutput::File {
                directory: directory.clone(),
                prefix: "otio-bridge".to_string(),
            });
        }
        log
    }

    /// Defaults with `OTIO_BRIDGE_LOG_*` environment variables applied
    pub fn from_env() -> Self {
        Self::new().with_env_overrides()
    }

    /// Apply `OTIO_BRIDGE_LOG_*` environment variables on top of `self`
    pub fn with_env_overrides(self) -> Self {
        self.overlay_env(|key| std::env::var(key).ok())
    }

    fn overlay_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = var(ENV_LOG_LEVEL).and_then(|l| parse_level(&l)) {
            self.level = level;
        }
        if let Some(json) = var(ENV_LOG_JSON) {
            if matches!(json.trim(), "1" | "true" | "yes") {
                self.format = LogFormat::Json;
            }
        }
        if let Some(directory) = var(ENV_LOG_FILE).filter(|d| !d.is_empty()) {
            self.output = LogOutput::File {
                directory,
                prefix: "otio-bridge".to_string(),
            };
        }
        self
    }
}

fn parse_level(text: &str) -> Option<Level> {
    Level::from_str(text.trim()).ok()
}

/// Install the global subscriber
///
/// Only the first call installs anything; later calls return `None`. Keep the
/// returned guard alive so buffered lines are flushed.
pub fn init_logging(config: LogConfig) -> Option<WorkerGuard> {
    let filter = build_filter(&config);
    let spans = span_events_config(config.span_events);

    let (writer, guard) = match &config.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File { directory, prefix } => {
            tracing_appender::non_blocking(rolling::daily(directory, prefix))
        }
    };

    let layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .pretty()
            .with_span_events(spans)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(writer)
            .compact()
            .with_span_events(spans)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(writer)
            .json()
            .with_span_events(spans)
            .with_filter(filter)
            .boxed(),
    };

    match tracing_subscriber::registry().with(layer).try_init() {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let base_filter = EnvFilter::from_default_env().add_directive(config.level.into());

    match &config.filter {
        Some(filter_str) => filter_str.split(',').fold(base_filter, |filter, directive| {
            filter.add_directive(directive.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid filter directive: {}", directive);
                config.level.into()
            }))
        }),
        None => base_filter,
    }
}

fn span_events_config(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Verbose stderr logging for local work
pub fn init_dev_logging() -> Option<WorkerGuard> {
    init_logging(LogConfig {
        level: Level::DEBUG,
        format: LogFormat::Pretty,
        output: LogOutput::Stderr,
        span_events: true,
        filter: Some("otio_bridge=trace,otio_native=debug".to_string()),
    })
}

/// JSON lines into a daily-rotated file under `log_dir`
pub fn init_prod_logging(log_dir: impl AsRef<Path>) -> Option<WorkerGuard> {
    init_logging(LogConfig {
        level: Level::INFO,
        format: LogFormat::Json,
        output: LogOutput::File {
            directory: log_dir.as_ref().to_string_lossy().to_string(),
            prefix: "otio-bridge".to_string(),
        },
        span_events: false,
        filter: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_span_events(true)
            .with_filter("otio_bridge=trace");

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.span_events);
        assert_eq!(config.filter, Some("otio_bridge=trace".to_string()));
    }

    #[test]
    fn test_env_overlay() {
        let config = LogConfig::new().overlay_env(|key| match key {
            ENV_LOG_LEVEL => Some("trace".to_string()),
            ENV_LOG_JSON => Some("1".to_string()),
            ENV_LOG_FILE => Some("/tmp/otio-logs".to_string()),
            _ => None,
        });

        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(
            config.output,
            LogOutput::File {
                directory: "/tmp/otio-logs".to_string(),
                prefix: "otio-bridge".to_string()
            }
        );
    }

    #[test]
    fn test_env_overlay_ignores_garbage() {
        let config = LogConfig::new().overlay_env(|key| match key {
            ENV_LOG_LEVEL => Some("loud".to_string()),
            ENV_LOG_JSON => Some("no".to_string()),
            _ => None,
        });
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.output, LogOutput::Stderr);
    }

    #[test]
    fn test_from_bridge_config() {
        let section = LoggingConfig {
            level: "warn".to_string(),
            json: true,
            directory: None,
        };
        let config = LogConfig::from_config(&section);
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_second_init_is_noop() {
        let first = init_logging(LogConfig::new().with_level(Level::ERROR));
        let second = init_logging(LogConfig::new());
        assert!(second.is_none());
        drop(first);
    }
}
