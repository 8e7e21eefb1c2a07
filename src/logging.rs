// ABOUTME: Logging configuration and structured logging setup for the workout session engine
// ABOUTME: Installs a tracing-subscriber registry with env filtering and keeps timer tick noise opt-in
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration
//!
//! Session transitions are logged at `info`, effects and ticks at `debug`.
//! A running set produces a phase tick every 50ms, so tick-level modules are
//! capped at `info` unless `GYMFLOW_TRACE_TICKS` is set.

use crate::constants::service_names;
use anyhow::{anyhow, Result};
use std::env;
use std::io;
use tracing::{info, info_span, Span};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Modules that log once per timer tick
const TICK_MODULES: [&str; 2] = [
    "pierre_workout_session::session::countdown",
    "pierre_workout_session::session::execution",
];

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` lines for log shipping
    Json,
    /// Full human output with targets
    Pretty,
    /// Single-line terminal output
    Compact,
}

impl LogFormat {
    /// Parse a format name, defaulting to compact output
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base filter directive, e.g. `info` or `pierre_workout_session=debug`
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Let countdown and rep cadence modules log every tick
    pub trace_ticks: bool,
    /// Service name attached to the session span
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
            include_location: false,
            trace_ticks: false,
            service_name: service_names::PIERRE_WORKOUT_SESSION.to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, `LOG_INCLUDE_LOCATION`, `GYMFLOW_TRACE_TICKS`
    /// and `SERVICE_NAME`
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: env::var("RUST_LOG").unwrap_or(defaults.level),
            format: env::var("LOG_FORMAT")
                .map_or(defaults.format, |value| LogFormat::from_str_or_default(&value)),
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            trace_ticks: env::var("GYMFLOW_TRACE_TICKS").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
        }
    }

    /// Filter built from `level`, with tick modules capped unless `trace_ticks`
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(&self.level);
        if !self.trace_ticks {
            for module in TICK_MODULES {
                if let Ok(directive) = format!("{module}=info").parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }
        filter
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_span_events(FmtSpan::NONE);
        match self.format {
            LogFormat::Json => layer.json().with_current_span(true).boxed(),
            LogFormat::Pretty => layer.with_target(true).boxed(),
            LogFormat::Compact => layer.compact().with_target(false).boxed(),
        }
    }

    /// Install the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        tracing_subscriber::registry()
            .with(self.fmt_layer())
            .with(self.env_filter())
            .try_init()
            .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

        info!(
            service = %self.service_name,
            level = %self.level,
            format = ?self.format,
            trace_ticks = self.trace_ticks,
            "logging configured"
        );
        Ok(())
    }

    /// Span wrapping one workout session
    #[must_use]
    pub fn session_span(&self, user_email: &str, workout_name: &str) -> Span {
        info_span!(
            "workout_session",
            service = %self.service_name,
            user = %user_email,
            workout = %workout_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default(" Pretty "), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_or_default("other"), LogFormat::Compact);
    }

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.service_name, service_names::PIERRE_WORKOUT_SESSION);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.trace_ticks);
    }

    #[test]
    fn test_tick_modules_capped_by_default() {
        let config = LoggingConfig {
            level: "debug".to_owned(),
            ..LoggingConfig::default()
        };
        let filter = config.env_filter().to_string().to_lowercase();
        assert!(filter.contains("pierre_workout_session::session::execution=info"));

        let verbose = LoggingConfig {
            trace_ticks: true,
            ..config
        };
        assert!(!verbose
            .env_filter()
            .to_string()
            .to_lowercase()
            .contains("execution=info"));
    }
}
