//! Logging system initialization
//!
//! Console output plus an optional append-only log file. The file layer
//! writes through `tracing_appender::non_blocking`, so a slow or failing disk
//! never stalls a request: lines are queued to a worker thread and dropped
//! when the queue is full.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config::LoggingConfig;

/// Target used for per-request access log lines.
pub const ACCESS_LOG_TARGET: &str = "access";

/// Initialize logging system based on configuration
///
/// `RUST_LOG` wins over `logging.level` when set.
///
/// # Returns
/// * `Some(WorkerGuard)` when file output is enabled. It must be kept alive
///   for the duration of the program so queued lines are flushed on exit.
///
/// # Errors
/// * If the log file cannot be opened
/// * If a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.format == "json";

    let console_layer = if json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().with_level(true).boxed()
    };

    let (file_layer, guard) = match open_log_writer(config)? {
        Some(writer) => {
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
            let layer = if json {
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_writer)
                    .boxed()
            } else {
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking_writer)
                    .boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

fn open_log_writer(
    config: &LoggingConfig,
) -> anyhow::Result<Option<Box<dyn std::io::Write + Send + Sync>>> {
    let log_file = config.file.trim();
    if log_file.is_empty() {
        return Ok(None);
    }

    if config.enable_rotation {
        let path = Path::new(log_file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("access.log");
        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)?;
        return Ok(Some(Box::new(appender)));
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    Ok(Some(Box::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_disables_file_output() {
        let config = LoggingConfig {
            file: "  ".to_string(),
            ..LoggingConfig::default()
        };
        assert!(open_log_writer(&config).unwrap().is_none());
    }

    #[test]
    fn test_plain_file_is_created_in_append_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        std::fs::write(&path, "existing line\n").unwrap();

        let config = LoggingConfig {
            file: path.to_string_lossy().into_owned(),
            ..LoggingConfig::default()
        };
        let mut writer = open_log_writer(&config).unwrap().unwrap();
        writer.write_all(b"new line\n").unwrap();
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing line\nnew line\n");
    }

    #[test]
    fn test_rotating_writer_builds_in_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file: dir.path().join("linkstat.log").to_string_lossy().into_owned(),
            enable_rotation: true,
            ..LoggingConfig::default()
        };
        assert!(open_log_writer(&config).unwrap().is_some());
    }
}
