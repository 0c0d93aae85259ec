//! Storyline Observability
//!
//! Console logging for the Storyline client, with an optional structured
//! JSON log file.
//!
//! - **Console**: compact, colored, filtered by `RUST_LOG` or `LOG_LEVEL`
//! - **File** (when `LOG_DIR` is set): daily rolling `storyline.json`
//!
//! # Examples
//!
//! ```no_run
//! use storyline_config::LogConfig;
//! use storyline_observability::init_logging;
//!
//! init_logging(&LogConfig::from_env());
//! tracing::info!("ready");
//! ```

use std::fs;

use storyline_config::LogConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. Calling it twice is harmless: the second
/// call keeps the first subscriber.
pub fn init_logging(config: &LogConfig) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(console_filter);

    let file_layer = config.log_dir.as_ref().and_then(|dir| {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("⚠️  Could not create log directory {}: {}", dir.display(), e);
            return None;
        }
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, "storyline.json");
        Some(
            fmt::layer()
                .json()
                .with_writer(appender)
                .with_current_span(true)
                .with_span_list(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new(config.default_directive())),
        )
    });

    let result = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Installs a test subscriber that writes through the test harness capture.
pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
