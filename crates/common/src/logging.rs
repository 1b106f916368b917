//! Logging and tracing initialization.

use std::fs::File;
use std::sync::Arc;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// With `config.file` set, output goes to that file (parent directories
/// are created, ANSI codes disabled); otherwise to stderr. Safe to call
/// more than once; later calls keep the first subscriber.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match (config.json, open_log_file(config)) {
        (true, Some(file)) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .with_writer(file)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (true, None) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (false, Some(file)) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (false, None) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

/// Open the configured log file, falling back to stderr on failure.
fn open_log_file(config: &LoggingConfig) -> Option<Arc<File>> {
    let path = config.file.as_ref()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).ok()?;
        }
    }
    match File::create(path) {
        Ok(file) => Some(Arc::new(file)),
        Err(e) => {
            eprintln!("Failed to open log file {path:?}: {e}; logging to stderr");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_is_created() {
        let path = std::env::temp_dir()
            .join("cutaway-logging-test")
            .join("cutaway.log");
        let _ = std::fs::remove_file(&path);

        let config = LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: Some(path.clone()),
        };
        init_logging(&config);
        assert!(path.exists());
    }

    #[test]
    fn test_missing_file_falls_back_to_stderr() {
        let config = LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: None,
        };
        assert!(open_log_file(&config).is_none());
        init_logging(&config);
    }
}
