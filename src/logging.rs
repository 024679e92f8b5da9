//! # Structured Logging Module
//!
//! Console logging for the engine and its CLI, pretty or JSON, with `RUST_LOG`
//! taking precedence over the configured level.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process. Later calls are no-ops.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = build_filter(&config.level);

        let layer = match config.format {
            LogFormat::Pretty => fmt::layer()
                .with_target(config.with_target)
                .with_thread_ids(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed(),
        };

        // A subscriber may already be installed by an embedding application
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        }

        tracing::info!(
            level = %config.level,
            format = %config.format,
            "Structured logging initialized"
        );
    });
}

/// `RUST_LOG` when set and parseable, otherwise the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_ascii_lowercase()))
}

/// Log a store round-trip with its outcome
pub fn log_store_operation(
    operation: &str,
    item_count: usize,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        item_count = item_count,
        status = %status,
        details = details,
        "STORE_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        "ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_configured_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = build_filter("WARN");
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::WARN)
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default();
        init_structured_logging(&config);
        init_structured_logging(&LoggingConfig {
            format: LogFormat::Json,
            ..LoggingConfig::default()
        });
        assert!(LOGGER_INITIALIZED.get().is_some());
    }

    #[test]
    fn test_operation_helpers_do_not_panic() {
        log_store_operation("fetch_tasks_by_business", 3, "ok", None);
        log_error("duplicate_cleanup", "soft_delete", "connection reset", Some("chunk 2"));
    }
}
