//! Ignore file discovery

use std::path::PathBuf;

/// Default ignore file name, looked up in the working directory
pub const DRIFTIGNORE_FILENAME: &str = ".driftignore";

/// Environment variable pointing directly at an ignore file
pub const DRIFTIGNORE_ENV: &str = "DRIFTIGNORE_PATH";

/// Find the ignore file to load
///
/// Searched in this order:
/// 1. `DRIFTIGNORE_PATH` environment variable
/// 2. `.driftignore` in the current directory
/// 3. `~/.config/driftflow/driftignore` (global rules)
pub fn find_ignore_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(DRIFTIGNORE_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
        tracing::warn!(path = %path.display(), "{} points to a missing file", DRIFTIGNORE_ENV);
    }

    if let Ok(current_dir) = std::env::current_dir() {
        let path = current_dir.join(DRIFTIGNORE_FILENAME);
        if path.is_file() {
            return Some(path);
        }
    }

    let global = dirs::config_dir()?.join("driftflow").join("driftignore");
    global.is_file().then_some(global)
}
