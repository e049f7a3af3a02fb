use crate::errors::{AppError, AppResult};
use anyhow::Context;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

pub const LOG_FILE_PREFIX: &str = "calculator.log";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Explicit filter directive; falls back to `RUST_LOG`, then `default_filter`.
    pub filter: Option<String>,
    pub default_filter: &'static str,
    /// When set, logs go to a daily rolling JSON file here instead of stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            filter: None,
            default_filter: "warn",
            log_dir: None,
        }
    }
}

fn build_filter(options: &LogOptions) -> AppResult<EnvFilter> {
    if let Some(directive) = options.filter.as_deref() {
        return EnvFilter::try_new(directive)
            .map_err(|error| AppError::Input(format!("Invalid log filter '{}': {}", directive, error)));
    }
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(options.default_filter)))
}

pub fn init_tracing(options: &LogOptions) -> AppResult<()> {
    let filter = build_filter(options)?;

    let Some(log_dir) = options.log_dir.as_ref() else {
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|error| AppError::Internal(error.to_string()));
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| AppError::Internal(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{build_filter, LogOptions};

    #[test]
    fn rejects_malformed_filter() {
        let options = LogOptions {
            filter: Some("sales_activity_lib=notalevel".to_string()),
            ..LogOptions::default()
        };
        let error = build_filter(&options).unwrap_err();
        assert!(error.to_string().starts_with("INPUT_INVALID"));
    }

    #[test]
    fn accepts_explicit_filter() {
        let options = LogOptions {
            filter: Some("debug".to_string()),
            ..LogOptions::default()
        };
        assert!(build_filter(&options).is_ok());
    }
}
