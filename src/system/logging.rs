//! Logging system initialization

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::StaticConfig;
use crate::errors::{BiolinkError, Result};

/// Initialize the global tracing subscriber
///
/// Output goes to stdout unless `logging.file` is set; with
/// `enable_rotation` the file rolls daily and keeps `max_backups` files.
/// The returned guard must stay alive for buffered lines to be flushed.
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &StaticConfig) -> Result<WorkerGuard> {
    let log_file = config
        .logging
        .file
        .as_deref()
        .filter(|file| !file.is_empty());

    let writer: Box<dyn Write + Send + Sync> = match log_file {
        Some(file) if config.logging.enable_rotation => {
            let path = Path::new(file);
            let dir = path.parent().unwrap_or(Path::new("."));
            let prefix = path
                .file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("biolink.log")
                .trim_end_matches(".log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(prefix)
                .filename_suffix("log")
                .max_log_files(config.logging.max_backups.max(1) as usize)
                .build(dir)
                .map_err(|e| {
                    BiolinkError::file_operation(format!("Cannot create log appender: {}", e))
                })?;
            Box::new(appender)
        }
        Some(file) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)?;
            Box::new(file)
        }
        None => Box::new(std::io::stdout()),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_file.is_none());

    let installed = if config.logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| BiolinkError::config(format!("Cannot install logger: {}", e)))?;

    Ok(guard)
}
