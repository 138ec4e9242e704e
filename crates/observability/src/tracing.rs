//! Tracing/logging initialization.
//!
//! Logs go to stderr so that stdout carries only command output.

use tracing_subscriber::EnvFilter;

use crate::LogFormat;

/// Filter used when `RUST_LOG` is unset or unparseable.
///
/// Quiet by default for a CLI; `RUST_LOG=info` or `debug` for detail.
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Text => builder.compact().without_time().try_init(),
    };
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_invalid_rust_log_falls_back_to_warn() {
        assert_eq!(env_filter(None).to_string(), DEFAULT_FILTER);
        assert_eq!(env_filter(Some("  ")).to_string(), DEFAULT_FILTER);
        assert_eq!(env_filter(Some("wattcast=loud")).to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn rust_log_overrides_default() {
        assert_eq!(env_filter(Some("debug")).to_string(), "debug");
    }
}
