//! File logging for the terminal front end. The terminal belongs to the
//! TUI, so events go to a log file and only when asked for.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

/// Holds the filter directive, e.g. `SPEEDTYPE_LOG=debug`.
pub const LOG_ENV: &str = "SPEEDTYPE_LOG";

/// Install the global subscriber if `SPEEDTYPE_LOG` is set. Returns the log
/// file path when logging was enabled.
pub fn init_from_env() -> io::Result<Option<PathBuf>> {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return Ok(None);
    };
    let Some(path) = AppDirs::log_path() else {
        return Ok(None);
    };
    init(&path, &directive)?;
    Ok(Some(path))
}

/// Append formatted events matching `directive` to the file at `path`.
pub fn init(path: &Path, directive: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    // a subscriber may already be installed; keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
