use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "TUCK_DIR";

/// Resolve the data directory: explicit flag, then `TUCK_DIR`, then
/// `$XDG_DATA_HOME/tuck`, then `~/.local/share/tuck`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let data_home = std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local").join("share"));
    data_home.join("tuck")
}

/// Path of the TUI log file inside the data directory
pub fn log_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join("tuck.log")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}
