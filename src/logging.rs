use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parse a `--log-level` value, falling back to `warn`.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env("HINTGRID_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("hintgrid={}", level.as_str().to_lowercase())))
}

/// Log to stderr so stdout stays clean for reports.
pub fn init_stderr(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a file while the terminal is in raw mode. Logging is skipped when
/// the file cannot be opened.
pub fn init_file(level: Level, path: &Path) {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init();
}
