use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "practice.log";

/// Keeps the non-blocking file writer alive; drop it last
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Where file logs go, if anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl FileLogSettings {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("PRACTICE_FILE_LOGS")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            dir: std::env::var("PRACTICE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs")),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

/// Install the global subscriber. Only binaries call this; library code just emits events.
pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    init_tracing_with(log_level, &FileLogSettings::from_env())
}

pub fn init_tracing_with(log_level: &str, files: &FileLogSettings) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match file_writer(files) {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    guard
}

fn file_writer(
    files: &FileLogSettings,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if !files.enabled {
        return None;
    }
    if let Err(err) = std::fs::create_dir_all(&files.dir) {
        eprintln!("failed to create log directory {}: {err}", files.dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, &files.dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}
