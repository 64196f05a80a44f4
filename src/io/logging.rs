use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Env var holding the tracing filter directive
pub const LOG_ENV: &str = "TOOLCRIB_LOG";

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("toolcrib.log")
}

/// Install the global subscriber, appending to `<data_dir>/toolcrib.log`.
///
/// The TUI owns stdout, so when the file cannot be opened events are
/// filtered but never written anywhere.
pub fn init_tracing(data_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let opened = data_dir.and_then(|dir| match open_log_file(dir) {
        Ok(file) => Some((log_path(dir), file)),
        Err(_) => None,
    });

    let result = match opened {
        Some((path, file)) => {
            let init = tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .try_init();
            if init.is_ok() {
                tracing::info!(path = %path.display(), "logging initialized");
            }
            init
        }
        None => tracing_subscriber::registry().with(env_filter).try_init(),
    };
    // A second init (tests, repeated runs in one process) keeps the first subscriber
    let _ = result;
}

fn open_log_file(data_dir: &Path) -> std::io::Result<fs::File> {
    fs::create_dir_all(data_dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(data_dir))
}
