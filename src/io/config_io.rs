use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for reading `config.toml`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read `config.toml` from the data directory. A missing file yields the
/// defaults; an unreadable or malformed one is an error.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_overrides() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            config_path(tmp.path()),
            "[ui]\nmessage_timeout_ms = 500\nshow_key_hints = false\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();
        let config = read_config(tmp.path()).unwrap();
        assert_eq!(config.ui.message_timeout_ms, 500);
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(config_path(tmp.path()), "[ui\nbroken").unwrap();
        let err = read_config(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
