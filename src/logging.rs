//! Structured logging bootstrap
//!
//! Logs go to stderr so `kubegen plan` can print destinations on stdout
//! without interleaving. Configured through:
//!
//! - `KUBEGEN_LOG_LEVEL` - trace/debug/info/warn/error (default `info`)
//! - `KUBEGEN_LOG_FORMAT` - `pretty` (default) or `json`
//! - `KUBEGEN_LOG_TARGET_FILTER` - extra comma-separated filter directives,
//!   e.g. `kubegen::tree=debug`
//!
//! `RUST_LOG`, when set, replaces the level-derived base filter.

use anyhow::Result;
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LEVEL_ENV: &str = "KUBEGEN_LOG_LEVEL";
pub const FORMAT_ENV: &str = "KUBEGEN_LOG_FORMAT";
pub const TARGET_FILTER_ENV: &str = "KUBEGEN_LOG_TARGET_FILTER";

/// Log format: pretty for terminals, JSON for CI log collectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var(LEVEL_ENV).unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(&env::var(FORMAT_ENV).unwrap_or_default()),
            target_filter: env::var(TARGET_FILTER_ENV).ok().filter(|f| !f.trim().is_empty()),
            include_location: false,
        }
    }

    /// Overrides the level, e.g. from `--verbose`.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Parsed level; anything unrecognised is `INFO`.
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Filter built from the level plus any target directives.
    ///
    /// Invalid directives are reported on stderr and skipped.
    pub fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept.
pub fn init_logging_with_config(config: &LogConfig) -> Result<bool> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let installed = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .is_ok();
    Ok(installed)
}

/// [`init_logging_with_config`] with [`LogConfig::from_env`].
pub fn init_logging() -> Result<bool> {
    init_logging_with_config(&LogConfig::from_env())
}
