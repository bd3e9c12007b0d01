//! Logging configuration and initialisation for caseflow services.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod logging;

pub use logging::{init_logging, LogExt};

/// Configuration for initializing the monitoring system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Service name attached to the startup log line
    pub service_name: String,
    /// Log level filter (e.g., "info,caseflow_core=debug"), overridden by `RUST_LOG`
    pub log_filter: String,
    /// Emit JSON instead of pretty logs on stdout
    pub enable_json_logging: bool,
    /// Also write JSON logs to this file, rotated daily
    pub log_file: Option<String>,
    /// Environment (dev, staging, prod)
    pub environment: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            service_name: "caseflow".to_string(),
            log_filter: "info".to_string(),
            enable_json_logging: false,
            log_file: None,
            environment: "dev".to_string(),
        }
    }
}

impl MonitoringConfig {
    /// Defaults overridden by `CASEFLOW_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `CASEFLOW_*` key
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("CASEFLOW_SERVICE_NAME") {
            if name.trim().is_empty() {
                warn!("Ignoring empty CASEFLOW_SERVICE_NAME");
            } else {
                config.service_name = name;
            }
        }

        if let Some(filter) = lookup("CASEFLOW_LOG_FILTER") {
            if filter.trim().is_empty() {
                warn!("Ignoring empty CASEFLOW_LOG_FILTER");
            } else {
                config.log_filter = filter;
            }
        }

        if let Some(json) = lookup("CASEFLOW_LOG_JSON") {
            match parse_flag(&json) {
                Some(enabled) => config.enable_json_logging = enabled,
                None => warn!("Invalid CASEFLOW_LOG_JSON value: {}", json),
            }
        }

        if let Some(file) = lookup("CASEFLOW_LOG_FILE") {
            config.log_file = if file.trim().is_empty() { None } else { Some(file) };
        }

        if let Some(env) = lookup("CASEFLOW_ENV") {
            config.environment = env;
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Initialize monitoring system
pub fn init(config: MonitoringConfig) -> anyhow::Result<()> {
    init_logging(&config)?;
    info!(environment = %config.environment, "Monitoring initialized");
    Ok(())
}

/// Shutdown the monitoring system
pub fn shutdown() {
    info!("Shutting down monitoring system");
}
