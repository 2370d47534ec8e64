use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;

/// Set up application logging based on configuration.
///
/// RUST_LOG takes precedence over the configured level. The returned guard
/// must be kept alive for file logging to flush.
pub fn setup_logging(config: &Config) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    match config.log_file_path() {
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .finish();

            if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
                eprintln!("Failed to set global tracing subscriber: {}", e);
            }
            None
        }
        Some(path) => {
            let (file_writer, guard) = match create_file_logger(path) {
                Ok(writer) => writer,
                Err(e) => {
                    eprintln!("Failed to open log file {}: {}", path, e);
                    return None;
                }
            };

            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(file_writer)
                .finish();

            if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
                eprintln!("Failed to set global tracing subscriber: {}", e);
            }
            Some(guard)
        }
    }
}

// Create file logger
fn create_file_logger(path: &str) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    let log_path = PathBuf::from(path);
    let log_dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => default_log_dir(),
    };

    // Create the directory if it doesn't exist
    std::fs::create_dir_all(&log_dir)?;

    let log_file_name = log_path
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("magic-link.log"));

    // Custom paths are written without rotation
    let file_appender = tracing_appender::rolling::never(&log_dir, log_file_name);
    Ok(tracing_appender::non_blocking(file_appender))
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("magic-link")
        .join("logs")
}
