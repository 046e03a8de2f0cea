//! LLM client abstraction and the chat-completions implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::config::ClassifierConfig;

/// Suffix appended to the API base when it is not already present.
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Error type for LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Request for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// User message
    pub prompt: String,
    /// Ask the endpoint for a JSON object response (`response_format`).
    pub json_output: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            json_output: false,
        }
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The generated text
    pub text: String,
    /// Token usage
    pub usage: LlmUsage,
    /// Model used
    pub model: String,
}

/// Trait for LLM clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name (e.g., "deep_seek", "custom")
    fn provider(&self) -> &str;

    /// Model name (e.g., "deepseek-chat")
    fn model(&self) -> &str;

    /// Send a completion request and get a text response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Build the chat completions URL from an API base.
///
/// Trailing slashes are trimmed and the path is appended only when the base
/// does not already end with it.
pub fn chat_completions_url(api_base: &str) -> String {
    let base = api_base.trim().trim_end_matches('/');
    if base.ends_with(CHAT_COMPLETIONS_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, CHAT_COMPLETIONS_PATH)
    }
}

// ============================================================================
// OpenAI-compatible chat completions
// ============================================================================

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
///
/// The underlying `reqwest::Client` only carries the timeout. Credentials are
/// attached to each request, so one client can be shared by concurrent calls.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    provider: String,
    api_key: String,
    model: String,
    url: String,
    timeout: Duration,
}

impl ChatCompletionsClient {
    pub fn new(
        api_base: impl AsRef<str>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            provider: "custom".to_string(),
            api_key: api_key.into(),
            model: model.into(),
            url: chat_completions_url(api_base.as_ref()),
            timeout,
        })
    }

    /// Build a client from configuration, resolving provider presets.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, LlmError> {
        let api_base = config
            .resolved_api_base()
            .ok_or_else(|| LlmError::NotConfigured("classifier api_base".to_string()))?;
        let model = config
            .resolved_model()
            .ok_or_else(|| LlmError::NotConfigured("classifier model".to_string()))?;

        let mut client = Self::new(
            api_base,
            config.api_key.clone(),
            model,
            Duration::from_secs(config.timeout_secs),
        )?;
        client.provider = config.provider.name().to_string();
        Ok(client)
    }

    /// The full endpoint URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    error: ChatErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ChatErrorDetail {
    message: String,
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let chat_request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: request.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ChatErrorBody>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout)
            } else {
                LlmError::Http(e.to_string())
            }
        })?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Json(format!("{}: {}", e, body)))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Json(format!("response has no message content: {}", body)))?;

        let usage = chat_response
            .usage
            .map(|u| LlmUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            text,
            usage,
            model: chat_response.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}
