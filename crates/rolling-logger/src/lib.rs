//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to a size-rotated file and
//! keeps the latest lines in memory. `log` records are forwarded too, so
//! crates using the `log` macros end up in the same file.

use std::path::PathBuf;
use std::sync::OnceLock;

mod writer;

pub use writer::{RollingOptions, RollingWriter};

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

/// Initialize with default rotation settings
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, RollingOptions::default())
}

/// Initialize the process-wide logger. Fails if a logger or another global
/// subscriber is already installed.
pub fn init_logger_with(log_dir: PathBuf, app_name: &str, options: RollingOptions) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Err("Logger already initialized".to_string());
    }

    let level = options.level;
    let writer = RollingWriter::open(&log_dir, app_name, options)?;

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    let path = writer.path();
    LOGGER
        .set(writer)
        .map_err(|_| "Logger already initialized".to_string())?;

    tracing::info!(
        "=== {} session started {} ({}) ===",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        path.display()
    );
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    match LOGGER.get() {
        Some(_) => Ok(()),
        None => Err("Logger not initialized".to_string()),
    }
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Latest log lines, oldest first. Empty before `init_logger`.
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|w| w.recent_lines()).unwrap_or_default()
}

/// Active log file, once initialized
pub fn log_file_path() -> Option<PathBuf> {
    LOGGER.get().map(|w| w.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber is process-global, so everything touching it lives in
    // one test.
    #[test]
    fn test_global_logger() {
        assert!(info("before init").is_err());
        assert!(recent_lines().is_empty());

        let dir = tempfile::tempdir().unwrap();
        init_logger(dir.path().to_path_buf(), "Board").expect("init failed");
        assert!(init_logger(dir.path().to_path_buf(), "Board").is_err());

        info("stage moved").unwrap();
        log::warn!("forwarded from log");

        let lines = recent_lines();
        assert!(lines.iter().any(|l| l.contains("session started")));
        assert!(lines.iter().any(|l| l.contains("stage moved")));
        assert!(lines.iter().any(|l| l.contains("forwarded from log")));
        assert_eq!(log_file_path(), Some(dir.path().join("Board.log")));
    }
}
