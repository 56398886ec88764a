use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::input::InputConfig;
use self::storage::StorageConfig;
use self::vision::VisionConfig;

pub mod capture;
pub mod input;
pub mod storage;
pub mod vision;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub capture: CaptureConfig,
    pub vision: VisionConfig,
    pub input: InputConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Build from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, unset keys fall back to defaults
    pub fn from_vars<F>(vars: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            capture: CaptureConfig::from_vars(&vars)?,
            vision: VisionConfig::from_vars(&vars)?,
            input: InputConfig::from_vars(&vars)?,
            storage: StorageConfig::from_vars(&vars),
        })
    }
}

/// Read and parse one variable, `None` when unset or blank
pub(crate) fn parse_var<T, F>(vars: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match vars(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}
