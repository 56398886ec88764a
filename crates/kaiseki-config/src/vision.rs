use serde::{Deserialize, Serialize};

use crate::{ConfigError, parse_var};

fn default_api_url() -> String {
    "https://ark.cn-beijing.volces.com/api/v3/chat/completions".to_string()
}

fn default_model() -> String {
    "doubao-seed-1-6-vision-250815".to_string()
}

fn default_prompt() -> String {
    "请提取图片中的日语，并用以下格式解析：\n1. 原文\n2. 生词解释（最多5个）\n3. 难句拆解（最多2句）\n4. 翻译（简洁版）".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

#[derive(Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Instruction sent alongside every screenshot
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

// Keeps the bearer token out of debug logs
impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("prompt", &self.prompt)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl VisionConfig {
    pub fn from_vars<F>(vars: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = vars("API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let api_url = vars("VISION_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_api_url);

        let model = vars("VISION_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_model);

        let prompt = vars("VISION_PROMPT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_prompt);

        let timeout_seconds =
            parse_var(vars, "REQUEST_TIMEOUT_SECONDS")?.unwrap_or_else(default_timeout_seconds);

        Ok(Self {
            api_key,
            api_url,
            model,
            prompt,
            timeout_seconds,
        })
    }
}
