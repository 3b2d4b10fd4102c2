//! Logging infrastructure for ado-workitems.
//!
//! This module provides optional tracing-based logging with support for:
//! - Multiple output targets (stderr, file)
//! - Configurable log levels
//! - Selectable format (text or JSON)
//!
//! Stdout is reserved for command output and never receives log lines.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub const ENV_LOG_LEVEL: &str = "ADO_WORKITEMS_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "ADO_WORKITEMS_LOG_FILE";
pub const ENV_LOG_FORMAT: &str = "ADO_WORKITEMS_LOG_FORMAT";

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a log level from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Convert to a filter string for tracing-subscriber.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

impl LogFormat {
    /// Parse a log format from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration for the logging system.
#[derive(Debug, Default)]
pub struct LogConfig {
    /// Log level (None means logging is disabled).
    pub level: Option<LogLevel>,
    /// Output file path (None means stderr).
    pub file: Option<PathBuf>,
    /// Output format.
    pub format: LogFormat,
}

/// Guard that must be held to ensure logs are flushed.
///
/// When this guard is dropped, all pending log messages are flushed.
/// Hold this until application exit.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Initialize the logging system.
///
/// Returns `Some(LogGuard)` if logging was initialized, `None` if logging is
/// disabled or the log file cannot be opened.
///
/// # Example
///
/// ```rust,no_run
/// use ado_workitems::logging::{LogConfig, LogLevel, LogFormat, init_logging};
/// use std::path::PathBuf;
///
/// let config = LogConfig {
///     level: Some(LogLevel::Debug),
///     file: Some(PathBuf::from("/tmp/ado-workitems.log")),
///     format: LogFormat::Text,
/// };
///
/// let _guard = init_logging(config);
/// ```
#[must_use = "the returned guard must be held until application exit"]
pub fn init_logging(config: LogConfig) -> Option<LogGuard> {
    let level = config.level?;

    // Only this crate's events; reqwest/hyper internals stay quiet
    let filter = EnvFilter::new(format!("ado_workitems={}", level.as_filter_str()));

    let (non_blocking, guard, to_file) = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (writer, guard, true)
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            (writer, guard, false)
        }
    };

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(to_file)
                .with_line_number(to_file);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Text if to_file => {
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_level(true)
                .compact();

            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
    }

    Some(LogGuard { _guard: guard })
}

/// Parse logging configuration from command-line arguments and environment.
///
/// This performs early parsing before full config resolution.
/// Precedence: CLI args > environment variables.
#[must_use]
pub fn parse_early_log_config(args: &[String]) -> LogConfig {
    let cli_level = extract_arg_value(args, "--log-level");
    let cli_file = extract_arg_value(args, "--log-file");
    let cli_format = extract_arg_value(args, "--log-format");

    let level_str = cli_level.or_else(|| std::env::var(ENV_LOG_LEVEL).ok());
    let file_str = cli_file.or_else(|| std::env::var(ENV_LOG_FILE).ok());
    let format_str = cli_format.or_else(|| std::env::var(ENV_LOG_FORMAT).ok());

    LogConfig {
        level: level_str.and_then(|s| LogLevel::parse(&s)),
        file: file_str.map(PathBuf::from),
        format: format_str
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or_default(),
    }
}

/// Extract a value following a flag in command-line arguments.
///
/// Accepts both `--flag value` and `--flag=value`.
fn extract_arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{}=", flag);
    args.iter()
        .find_map(|a| a.strip_prefix(&prefix).map(str::to_string))
        .or_else(|| args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone()))
}
