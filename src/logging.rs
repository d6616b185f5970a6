// Conditional logging macros - only active in debug builds

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

const APP_DIR: &str = "study-hangman";
const DEFAULT_FILTER: &str = "study_hangman=info";

/// Where logs go when no `--log-file` is given.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join(APP_DIR);
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    Some(dir.join(format!("session-{stamp}.log")))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Install the global logger. `RUST_LOG` overrides the default filter.
///
/// Logs are written to a file so they never draw over the TUI. Without a
/// usable file, plain mode logs to stderr and TUI mode does not log at all.
/// Returns the file in use, if any.
pub fn init(log_file: Option<PathBuf>, allow_stderr: bool) -> Option<PathBuf> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));

    let path = log_file.or_else(default_log_path);
    let file = path
        .as_ref()
        .and_then(|p| open_log_file(p).map_err(|e| eprintln!("Cannot open log file {}: {e}", p.display())).ok());

    let in_use = match file {
        Some(file) => {
            builder.target(Target::Pipe(Box::new(file)));
            path
        }
        None if allow_stderr => {
            builder.target(Target::Stderr);
            None
        }
        None => return None,
    };

    // A logger installed twice (as in tests) is not an error worth surfacing.
    let _ = builder.try_init();
    in_use
}
