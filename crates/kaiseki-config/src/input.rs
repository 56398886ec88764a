use serde::{Deserialize, Serialize};

use crate::{ConfigError, parse_var};

fn default_capture_keys() -> String {
    "NumpadAdd,LShift+Equal,RShift+Equal".to_string()
}

fn default_exit_keys() -> String {
    "Escape".to_string()
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_debounce_ms() -> u64 {
    500
}

/// Key bindings and loop timing
///
/// Bindings are comma-separated alternatives, each a `+`-joined chord of key
/// names, e.g. `NumpadAdd,LShift+Equal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_capture_keys")]
    pub capture_keys: String,
    #[serde(default = "default_exit_keys")]
    pub exit_keys: String,
    /// Delay between key-state polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Pause after a capture cycle so a held key does not retrigger
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            capture_keys: default_capture_keys(),
            exit_keys: default_exit_keys(),
            poll_interval_ms: default_poll_interval_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl InputConfig {
    pub fn from_vars<F>(vars: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let capture_keys = vars("CAPTURE_KEYS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_capture_keys);

        let exit_keys = vars("EXIT_KEYS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_exit_keys);

        let poll_interval_ms =
            parse_var(vars, "POLL_INTERVAL_MS")?.unwrap_or_else(default_poll_interval_ms);
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_MS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let debounce_ms = parse_var(vars, "DEBOUNCE_MS")?.unwrap_or_else(default_debounce_ms);

        Ok(Self {
            capture_keys,
            exit_keys,
            poll_interval_ms,
            debounce_ms,
        })
    }
}
