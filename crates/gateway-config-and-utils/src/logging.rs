//! Logging initialization for the gateway.
//!
//! Delegates to the observability crate: compact stderr output always, plus
//! JSON-lines in `~/.vehicle-gateway/logs/gateway.jsonl` when enabled.

use std::path::PathBuf;

const SERVICE_NAME: &str = "vehicle-gateway";

/// Initialize the logging system.
///
/// `RUST_LOG`, when set, takes precedence over `level`. Falls back to stderr
/// only if the JSON log file cannot be opened.
pub fn init_logging(level: &str, json_log_path: Option<PathBuf>) {
    let default_level = default_filter(level);
    let config = observability::LogConfig {
        service_name: SERVICE_NAME.into(),
        default_level: default_level.clone(),
        log_path: json_log_path.clone(),
        also_stderr: true,
    };

    if let Err(err) = observability::init_with_config(config) {
        if json_log_path.is_some() {
            let fallback = observability::LogConfig {
                service_name: SERVICE_NAME.into(),
                default_level,
                log_path: None,
                also_stderr: true,
            };
            if observability::init_with_config(fallback).is_ok() {
                tracing::warn!(error = %err, "JSON log file unavailable, logging to stderr only");
            }
        }
    }
}

/// Plain level names are normalized ("warning" becomes "warn"); filter
/// directives such as `vehicle_cli_ops=debug` pass through untouched.
fn default_filter(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        parse_level(level).to_string().to_lowercase()
    }
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_all_variants() {
        assert_eq!(parse_level("trace"), tracing::Level::TRACE);
        assert_eq!(parse_level("debug"), tracing::Level::DEBUG);
        assert_eq!(parse_level("info"), tracing::Level::INFO);
        assert_eq!(parse_level("warn"), tracing::Level::WARN);
        assert_eq!(parse_level("warning"), tracing::Level::WARN);
        assert_eq!(parse_level("error"), tracing::Level::ERROR);
    }

    #[test]
    fn parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), tracing::Level::TRACE);
        assert_eq!(parse_level("Warning"), tracing::Level::WARN);
    }

    #[test]
    fn parse_level_unknown_defaults_to_info() {
        assert_eq!(parse_level(""), tracing::Level::INFO);
        assert_eq!(parse_level("verbose"), tracing::Level::INFO);
    }

    #[test]
    fn default_filter_normalizes_plain_levels() {
        assert_eq!(default_filter("Warning"), "warn");
        assert_eq!(default_filter("bogus"), "info");
        assert_eq!(
            default_filter("info,vehicle_cli_ops=debug"),
            "info,vehicle_cli_ops=debug"
        );
    }
}
