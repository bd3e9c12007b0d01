//! Structured logging using tracing.
//!
//! Pretty output for development, JSON for log aggregation, and an optional
//! daily-rolling JSON file.

use anyhow::Context;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::MonitoringConfig;

/// Initialize structured logging
pub fn init_logging(config: &MonitoringConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter: {}", config.log_filter))?;

    let json_layer = config.enable_json_logging.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    let pretty_layer = (!config.enable_json_logging).then(|| {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    let file_layer = match &config.log_file {
        Some(log_file) => {
            let (directory, file_name) = split_log_path(log_file)?;
            let file_appender = tracing_appender::rolling::daily(directory, file_name);
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(file_appender),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    info!(
        service_name = %config.service_name,
        log_format = if config.enable_json_logging { "json" } else { "pretty" },
        log_file = ?config.log_file,
        "Logging initialized"
    );

    Ok(())
}

/// Split a log path into the appender's directory and file name prefix
fn split_log_path(log_file: &str) -> anyhow::Result<(&Path, &Path)> {
    let path = Path::new(log_file);
    let file_name = path
        .file_name()
        .map(Path::new)
        .with_context(|| format!("Log file path has no file name: {}", log_file))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((directory, file_name))
}

/// Trait to add log context to results
pub trait LogExt<T, E> {
    /// Log error with additional context before returning
    fn log_err(self, message: &str) -> Result<T, E>;

    /// Log success with additional context before returning
    fn log_ok(self, message: &str) -> Result<T, E>;
}

impl<T, E: std::fmt::Display> LogExt<T, E> for Result<T, E> {
    fn log_err(self, message: &str) -> Result<T, E> {
        if let Err(ref e) = self {
            tracing::error!("{}: {}", message, e);
        }
        self
    }

    fn log_ok(self, message: &str) -> Result<T, E> {
        if self.is_ok() {
            tracing::info!("{}", message);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path("/var/log/caseflow/app.log").unwrap();
        assert_eq!(dir, Path::new("/var/log/caseflow"));
        assert_eq!(name, Path::new("app.log"));

        let (dir, name) = split_log_path("app.log").unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, Path::new("app.log"));

        assert!(split_log_path("/").is_err());
    }

    #[test]
    fn test_log_ext_passes_results_through() {
        let ok: Result<u8, String> = Ok(1);
        assert_eq!(ok.log_ok("loaded").log_err("failed"), Ok(1));

        let err: Result<u8, String> = Err("boom".to_string());
        assert_eq!(err.log_ok("loaded").log_err("failed"), Err("boom".to_string()));
    }
}
