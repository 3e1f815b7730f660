// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Logging setup for processes embedding the provider.
//!
//! Format: timestamp file:line LEVEL message, e.g.
//! `2025-11-29T23:45:00.123456Z resource.rs:88 INFO Created A record`.
//!
//! - `RUST_LOG` selects the filter; `info` when unset or invalid.
//! - `RUST_LOG_FORMAT=json` switches to JSON lines; anything else is compact text.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the output format
pub const ENV_LOG_FORMAT: &str = "RUST_LOG_FORMAT";

/// Output format of the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    /// Parse a `RUST_LOG_FORMAT` value; unrecognised values mean text.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Returns `false` if a subscriber was already installed, so embedding
/// processes and tests may call it more than once.
pub fn init_logging() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = LogFormat::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref());

    let installed = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_target(false)
            .json()
            .try_init()
            .is_ok(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_target(false)
            .with_ansi(true)
            .compact()
            .try_init()
            .is_ok(),
    };

    if installed {
        debug!(format = ?format, "Logging initialized with file and line number tracking");
    }
    installed
}
