use serde::{Deserialize, Serialize};

/// Configuration from `config.toml` in the data directory. Every field is
/// optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long transient messages stay on the status line
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Whether the archive section starts expanded
    #[serde(default)]
    pub archive_open: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            message_timeout_ms: default_message_timeout_ms(),
            show_key_hints: true,
            archive_open: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default tracing filter when `TUCK_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_message_timeout_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}
