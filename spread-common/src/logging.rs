//! Logging setup for the spread pipeline.
//!
//! Everything is written to stderr; stdout belongs to the rendered report.
//!
//! # Noise Filtering
//!
//! Runtime modules are held at `warn` so stage logs stay readable at `debug`.
//! `RUST_LOG`, when set, replaces the whole filter.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Modules always held at `warn`.
pub const NOISY_MODULES: &[&str] = &["tokio", "tokio_util", "mio", "runtime"];

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Single-line human output
    Compact,
    /// Multi-line human output
    Pretty,
}

impl LogFormat {
    /// Unknown names fall back to `Pretty`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

fn build_filter(log_level: &str, excluded_targets: &[String]) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directives = NOISY_MODULES
        .iter()
        .copied()
        .chain(excluded_targets.iter().map(String::as_str))
        .fold(log_level.to_string(), |mut acc, target| {
            acc.push_str(&format!(",{target}=warn"));
            acc
        });

    EnvFilter::new(directives)
}

/// Initialize logging at `log_level` (trace, debug, info, warn, error) in
/// `log_format` (json, compact, pretty).
pub fn init_logging(log_level: &str, log_format: &str) {
    init_logging_with_exclusions(log_level, log_format, &[]);
}

/// Like [`init_logging`], also holding `excluded_targets` at `warn`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging_with_exclusions(
    log_level: &str,
    log_format: &str,
    excluded_targets: &[String],
) {
    let format = LogFormat::parse(log_format);
    let registry = tracing_subscriber::registry().with(build_filter(log_level, excluded_targets));
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => registry
            .with(
                layer
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Compact => registry.with(layer.compact().with_target(false)).try_init(),
        LogFormat::Pretty => registry.with(layer.with_ansi(true).with_target(true)).try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(
            log_level,
            format = ?format,
            suppressed = NOISY_MODULES.len() + excluded_targets.len(),
            "Logging initialized"
        );
    }
}
