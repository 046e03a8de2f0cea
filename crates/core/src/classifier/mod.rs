//! Filename classification through an OpenAI-compatible completion endpoint.
//!
//! A file name goes in, a [`MediaInfo`](crate::media::MediaInfo) comes out.
//! The endpoint is any `/chat/completions` service; provider presets only
//! supply a default base URL and model.

mod config;
mod llm;
mod llm_classifier;
mod prompt;

pub use config::{ClassifierConfig, LlmProvider};
pub use llm::{
    chat_completions_url, ChatCompletionsClient, CompletionRequest, CompletionResponse, LlmClient,
    LlmError, LlmUsage,
};
pub use llm_classifier::{parse_media_info, strip_code_fence, Classifier};
pub use prompt::build_prompt;

/// Why a file could not be classified.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("completion request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("unparseable model output: {0}")]
    Parse(String),

    #[error("model returned no title")]
    MissingTitle,
}
