//! Structured logging setup

use super::{ObservabilityError, ObservabilityResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub component: String,
    pub include_line_numbers: bool,
    pub include_thread_ids: bool,
    /// Route output through the test writer so `cargo test` captures it
    pub test_writer: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            component: "storage-client".to_string(),
            include_line_numbers: true,
            include_thread_ids: false,
            test_writer: false,
        }
    }
}

impl LogConfig {
    /// Directive used when `RUST_LOG` is not set.
    ///
    /// The AWS SDK crates are noisy at debug level, so they stay at `warn`
    /// unless the configured level is stricter.
    pub fn default_directive(&self) -> String {
        match self.level {
            LogLevel::Trace | LogLevel::Debug | LogLevel::Info => format!(
                "{level},aws_config=warn,aws_smithy_runtime=warn,aws_sdk_s3=warn",
                level = self.level.as_str()
            ),
            LogLevel::Warn | LogLevel::Error => self.level.as_str().to_string(),
        }
    }
}

/// Initialize the global subscriber with a compact single-line format
pub fn init_logging(config: LogConfig) -> ObservabilityResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(config.include_thread_ids)
        .with_line_number(config.include_line_numbers);

    let result = if config.test_writer {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_test_writer())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
    };
    result.map_err(|e| ObservabilityError::Logging(e.to_string()))?;

    tracing::info!(
        component = %config.component,
        level = %config.level.as_str(),
        "Logging initialized"
    );

    Ok(())
}

/// Debug logging captured by the test harness.
///
/// Safe to call from several tests: a second initialization is ignored.
pub fn init_test_logging() {
    let _ = init_logging(LogConfig {
        level: LogLevel::Debug,
        component: "tests".to_string(),
        include_line_numbers: false,
        include_thread_ids: false,
        test_writer: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_default_directive_quiets_sdk_crates() {
        let config = LogConfig {
            level: LogLevel::Debug,
            ..Default::default()
        };
        let directive = config.default_directive();
        assert!(directive.starts_with("debug,"));
        assert!(directive.contains("aws_smithy_runtime=warn"));
    }

    #[test]
    fn test_default_directive_strict_levels() {
        let config = LogConfig {
            level: LogLevel::Error,
            ..Default::default()
        };
        assert_eq!(config.default_directive(), "error");
    }

    #[test]
    fn test_init_test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_second_init_reports_error() {
        init_test_logging();
        let result = init_logging(LogConfig {
            test_writer: true,
            ..Default::default()
        });
        assert!(matches!(result, Err(ObservabilityError::Logging(_))));
    }
}
