//! Classifier configuration types.

use serde::{Deserialize, Serialize};

/// Completion endpoint provider.
///
/// Every provider speaks the OpenAI-compatible chat completions protocol;
/// the preset only supplies a default base URL and model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// SiliconFlow hosted models.
    SiliconFlow,
    /// DeepSeek official API.
    DeepSeek,
    /// Volcengine Ark (Doubao). The model is an endpoint id (`ep-...`).
    Doubao,
    /// Google Gemini through its OpenAI-compatible surface.
    Gemini,
    /// OpenAI API.
    OpenAi,
    /// Any other OpenAI-compatible endpoint; `api_base` and `model` are required.
    #[default]
    Custom,
}

impl LlmProvider {
    /// Default API base URL for this provider.
    pub fn default_api_base(&self) -> Option<&'static str> {
        match self {
            LlmProvider::SiliconFlow => Some("https://api.siliconflow.cn/v1"),
            LlmProvider::DeepSeek => Some("https://api.deepseek.com"),
            LlmProvider::Doubao => Some("https://ark.cn-beijing.volces.com/api/v3"),
            LlmProvider::Gemini => Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            LlmProvider::OpenAi => Some("https://api.openai.com/v1"),
            LlmProvider::Custom => None,
        }
    }

    /// Default model for this provider.
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            LlmProvider::SiliconFlow => Some("deepseek-ai/DeepSeek-V3"),
            LlmProvider::DeepSeek => Some("deepseek-chat"),
            LlmProvider::Gemini => Some("gemini-1.5-flash"),
            LlmProvider::OpenAi => Some("gpt-4o-mini"),
            LlmProvider::Doubao | LlmProvider::Custom => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::SiliconFlow => "silicon_flow",
            LlmProvider::DeepSeek => "deep_seek",
            LlmProvider::Doubao => "doubao",
            LlmProvider::Gemini => "gemini",
            LlmProvider::OpenAi => "open_ai",
            LlmProvider::Custom => "custom",
        }
    }
}

/// Completion endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Provider preset.
    #[serde(default)]
    pub provider: LlmProvider,
    /// API base URL; overrides the provider default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Model name; overrides the provider default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Bearer token for the endpoint.
    #[serde(default)]
    pub api_key: String,
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    60
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            api_base: None,
            model: None,
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClassifierConfig {
    /// The API base to use: explicit value first, then the provider preset.
    pub fn resolved_api_base(&self) -> Option<String> {
        self.api_base
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.provider.default_api_base().map(str::to_string))
    }

    /// The model to use: explicit value first, then the provider preset.
    pub fn resolved_model(&self) -> Option<String> {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.provider.default_model().map(str::to_string))
    }
}
