//! Structured logging for the directory.
//!
//! Logging goes through the `tracing` crate. Filters come from the
//! `ADDRSPACE_LOG` environment variable.
//!
//! # Environment Variables
//!
//! - `ADDRSPACE_LOG=info` - Default log level (info)
//! - `ADDRSPACE_LOG=debug` - Registration changes and traversal hand-offs
//! - `ADDRSPACE_LOG=addrspace_directory::aggregator=debug` - Module-specific logging
//!
//! # Example
//!
//! ```ignore
//! use addrspace_directory::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//!
//! // Or with a custom default level
//! logging::init_with_default("debug");
//! ```

use crate::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV: &str = "ADDRSPACE_LOG";

/// Initializes the global tracing subscriber with default settings.
///
/// Default level is `info` if `ADDRSPACE_LOG` is not set. Subsequent calls are
/// ignored (tracing only allows one subscriber).
pub fn init() {
    init_with_default("info");
}

/// Initializes the global tracing subscriber with a custom default level.
pub fn init_with_default(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    // Try to set the global default - ignore if already set
    let _ = subscriber.try_init();
}

/// Initializes logging with JSON output format.
///
/// Useful for production environments where logs are processed by log aggregators.
pub fn init_json() {
    init_json_with_default("info");
}

fn init_json_with_default(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = fmt().with_env_filter(filter).with_target(true).json();

    let _ = subscriber.try_init();
}

/// Initializes logging from a [`LoggingConfig`].
pub fn init_from_config(config: &LoggingConfig) {
    if config.json {
        init_json_with_default(&config.level);
    } else {
        init_with_default(&config.level);
    }
}
