use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted `tasks` and `theme` keys.
    /// If absent, the platform data directory is used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Colorize output with the current theme's palette
    #[serde(default = "default_true")]
    pub color: bool,
    /// Show the progress bar above the board
    #[serde(default = "default_true")]
    pub show_progress: bool,
    /// Task text longer than this (in terminal cells) is truncated on the board
    #[serde(default = "default_max_text_width")]
    pub max_text_width: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            color: true,
            show_progress: true,
            max_text_width: default_max_text_width(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_text_width() -> usize {
    60
}
