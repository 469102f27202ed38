// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Structured logging configuration for the pipeline.

use anyhow::Result;
use std::env;
use std::io;
use tracing::{info, warn};
use uuid::Uuid;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include span information for tracing
    pub include_spans: bool,
    /// Environment (development, staging, production)
    pub environment: String,
}

#[derive(Debug, Clone)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            environment: "development".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            environment,
        }
    }

    /// Initialize the global tracing subscriber
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);

        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).init();
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);
                registry.with(pretty_layer).init();
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false)
                    .with_writer(io::stdout)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).init();
            }
        }

        info!(
            service.name = "unyield-core",
            service.version = env!("CARGO_PKG_VERSION"),
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Unyield pipeline logging initialized"
        );

        Ok(())
    }
}

/// Initialize logging with default configuration
pub fn init_default() -> Result<()> {
    LoggingConfig::default().init()
}

/// Initialize logging from environment
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Domain-specific logging helpers, shared by the moderation and report
/// pipelines so every decision is logged with the same field names.
pub struct AppLogger;

impl AppLogger {
    /// Log a moderation decision on a submission
    pub fn log_moderation_event(
        admin_id: Uuid,
        submission_id: Uuid,
        decision: &str,
        points: i64,
    ) {
        info!(
            admin.id = %admin_id,
            submission.id = %submission_id,
            moderation.decision = %decision,
            moderation.points = points,
            "Moderation decision"
        );
    }

    /// Log a report lifecycle event
    pub fn log_report_event(
        report_id: Uuid,
        submission_id: Uuid,
        event: &str,
        action: Option<&str>,
    ) {
        info!(
            report.id = %report_id,
            submission.id = %submission_id,
            report.event = %event,
            report.action = action.unwrap_or("none"),
            "Report event"
        );
    }

    /// Log a failed best-effort notification
    pub fn log_notification_failure(user_id: Uuid, event: &str, error: &str) {
        warn!(
            user.id = %user_id,
            notification.event = %event,
            notification.error = %error,
            "Notification dispatch failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(matches!(config.format, LogFormat::Pretty));
        assert_eq!(config.environment, "development");
        assert!(!config.include_location);
    }

    #[test]
    fn test_app_logger_helpers_emit_without_subscriber() {
        // Helpers must be callable before (or without) subscriber init.
        let admin = Uuid::new_v4();
        let submission = Uuid::new_v4();
        AppLogger::log_moderation_event(admin, submission, "approved", 100);
        AppLogger::log_report_event(Uuid::new_v4(), submission, "filed", None);
        AppLogger::log_notification_failure(admin, "submission_verified", "connection refused");
    }

    #[test]
    fn test_logging_config_from_env() {
        env::set_var("RUST_LOG", "debug");
        env::set_var("LOG_FORMAT", "json");
        env::set_var("ENVIRONMENT", "production");

        let config = LoggingConfig::from_env();

        assert_eq!(config.level, "debug");
        assert!(matches!(config.format, LogFormat::Json));
        assert_eq!(config.environment, "production");
        assert!(config.include_location);

        env::remove_var("RUST_LOG");
        env::remove_var("LOG_FORMAT");
        env::remove_var("ENVIRONMENT");
    }
}
