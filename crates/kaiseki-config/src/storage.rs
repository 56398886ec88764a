use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from("screenshots")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: default_screenshot_dir(),
            log_dir: default_log_dir(),
        }
    }
}

impl StorageConfig {
    pub fn from_vars<F>(vars: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let screenshot_dir = vars("SCREENSHOT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_screenshot_dir);

        let log_dir = vars("LOG_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        Self {
            screenshot_dir,
            log_dir,
        }
    }
}
