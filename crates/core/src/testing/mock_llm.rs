//! Mock completion endpoint for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::classifier::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};

/// What the mock answers with.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Status { status: u16, message: String },
}

impl MockReply {
    fn to_result(&self) -> Result<CompletionResponse, LlmError> {
        match self {
            MockReply::Text(text) => Ok(CompletionResponse {
                text: text.clone(),
                usage: LlmUsage::default(),
                model: "mock-model".to_string(),
            }),
            MockReply::Status { status, message } => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Mock implementation of the LlmClient trait.
///
/// Replies are chosen by the first rule whose needle occurs in the prompt;
/// otherwise the default reply is used. Every prompt is recorded.
///
/// # Example
///
/// ```rust,ignore
/// use autoshelf_core::testing::MockLlmClient;
///
/// let llm = MockLlmClient::new();
/// llm.respond_to("Oppenheimer.2023", r#"{"title":"Oppenheimer","type":"Movie","year":"2023"}"#).await;
/// llm.fail_with_status(401, "invalid key").await; // everything else
/// ```
#[derive(Debug)]
pub struct MockLlmClient {
    rules: Arc<RwLock<Vec<(String, MockReply)>>>,
    default_reply: Arc<RwLock<MockReply>>,
    prompts: Arc<RwLock<Vec<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    /// A mock that answers `{}` (no title) to everything.
    pub fn new() -> Self {
        Self::with_response("{}")
    }

    /// A mock that answers `text` to everything.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            rules: Arc::new(RwLock::new(Vec::new())),
            default_reply: Arc::new(RwLock::new(MockReply::Text(text.into()))),
            prompts: Arc::new(RwLock::new(Vec::new())),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Answer `text` whenever the prompt contains `needle`.
    pub async fn respond_to(&self, needle: impl Into<String>, text: impl Into<String>) {
        self.rules
            .write()
            .await
            .push((needle.into(), MockReply::Text(text.into())));
    }

    /// Answer with an HTTP error whenever the prompt contains `needle`.
    pub async fn fail_for(&self, needle: impl Into<String>, status: u16) {
        self.rules.write().await.push((
            needle.into(),
            MockReply::Status {
                status,
                message: "mock failure".to_string(),
            },
        ));
    }

    /// Make the default reply an HTTP error.
    pub async fn fail_with_status(&self, status: u16, message: impl Into<String>) {
        *self.default_reply.write().await = MockReply::Status {
            status,
            message: message.into(),
        };
    }

    /// Wait this long before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// All prompts received so far.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.read().await.clone()
    }

    /// Number of completion calls received.
    pub async fn call_count(&self) -> usize {
        self.prompts.read().await.len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.prompts.write().await.push(request.prompt.clone());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let rules = self.rules.read().await;
        let reply = rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());
        drop(rules);

        match reply {
            Some(reply) => reply.to_result(),
            None => self.default_reply.read().await.to_result(),
        }
    }
}
