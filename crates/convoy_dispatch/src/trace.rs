//! Tracing subscriber setup for dispatch runs.
//!
//! Provides [`TraceConfig`], a small builder over the `tracing` subscriber
//! so binaries embedding a dispatcher get structured output for the run and
//! phase events the dispatcher emits.
//!
//! # Example
//!
//! ```
//! use convoy_dispatch::trace::{TraceConfig, TraceFormat};
//! use tracing::Level;
//!
//! TraceConfig::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TraceFormat::Compact)
//!     .init();
//!
//! tracing::info!("dispatcher wired up");
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TraceFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Trace output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TraceConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing subscriber configuration.
///
/// # Configuration Options
///
/// ```
/// use convoy_dispatch::trace::{TraceConfig, TraceFormat};
/// use tracing::Level;
///
/// // Development: Pretty colored output with debug level
/// let dev_config = TraceConfig::new()
///     .with_level(Level::DEBUG)
///     .with_format(TraceFormat::Pretty)
///     .with_span_events(true);  // Show span enter/exit
///
/// // Production: JSON output for log aggregation
/// let prod_config = TraceConfig::new()
///     .with_level(Level::INFO)
///     .with_format(TraceFormat::Json)
///     .with_env_filter("convoy=info,hyper=warn");
/// ```
///
/// # Environment Filter
///
/// Use `with_env_filter` to set target-specific log levels:
///
/// ```
/// use convoy_dispatch::trace::TraceConfig;
///
/// TraceConfig::new()
///     .with_env_filter("convoy_dispatch=trace,convoy_system=info")
/// # ;
/// ```
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TraceFormat,
    /// Environment filter (e.g., "convoy=debug,hyper=warn").
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TraceFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TraceConfig {
    /// Creates a new `TraceConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TraceFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Installs the global tracing subscriber described by this config.
    ///
    /// Safe to call more than once; only the first installation wins.
    pub fn init(self) {
        // Build the environment filter
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        };

        // Build span events configuration
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // Initialize subscriber based on format
        // Note: try_init().ok() ignores errors if already initialized
        match self.format {
            TraceFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TraceFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TraceFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::debug!(format = ?self.format, "trace subscriber initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_format_default_is_pretty() {
        let format = TraceFormat::default();
        assert_eq!(format, TraceFormat::Pretty);
    }

    #[test]
    fn trace_config_default_level_is_info() {
        let config = TraceConfig::default();
        assert_eq!(config.level, Level::INFO);
    }

    #[test]
    fn trace_config_with_level() {
        let config = TraceConfig::new().with_level(Level::DEBUG);
        assert_eq!(config.level, Level::DEBUG);
    }

    #[test]
    fn trace_config_with_format() {
        let config = TraceConfig::new().with_format(TraceFormat::Json);
        assert_eq!(config.format, TraceFormat::Json);
    }

    #[test]
    fn trace_config_with_env_filter() {
        let config = TraceConfig::new().with_env_filter("convoy=debug");
        assert_eq!(config.env_filter, Some("convoy=debug".to_string()));
    }

    #[test]
    fn trace_config_with_span_events() {
        let config = TraceConfig::new().with_span_events(true);
        assert!(config.span_events);
    }
}
