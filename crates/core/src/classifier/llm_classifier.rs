//! LLM-backed filename classifier.

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use super::config::ClassifierConfig;
use super::llm::{ChatCompletionsClient, CompletionRequest, LlmClient, LlmError};
use super::prompt::build_prompt;
use super::ClassificationError;
use crate::media::MediaInfo;
use crate::metrics;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*[ \t]*\n?(.*?)\s*```\s*$").unwrap()
});

/// Turns a file name into a [`MediaInfo`] with one completion call.
///
/// No retry and no backoff. Every failure is an `Err`; callers decide how
/// loudly to report it.
#[derive(Clone)]
pub struct Classifier {
    client: Arc<dyn LlmClient>,
}

impl Classifier {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Build a classifier talking to the configured chat completions endpoint.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, LlmError> {
        let client = ChatCompletionsClient::from_config(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn client(&self) -> &Arc<dyn LlmClient> {
        &self.client
    }

    /// Classify a file name (not a full path).
    pub async fn classify(&self, filename: &str) -> Result<MediaInfo, ClassificationError> {
        let start = Instant::now();
        let request = CompletionRequest::new(build_prompt(filename)).with_json_output();

        let result = match self.client.complete(request).await {
            Ok(response) => {
                debug!(
                    model = %response.model,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Completion received"
                );
                parse_media_info(&response.text)
            }
            Err(e) => Err(ClassificationError::Llm(e)),
        };

        let label = result_label(&result);
        metrics::CLASSIFICATION_REQUESTS
            .with_label_values(&[label])
            .inc();
        metrics::CLASSIFICATION_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            debug!(file = %filename, provider = self.client.provider(), error = %e, "Classification failed");
        }

        result
    }
}

fn result_label(result: &Result<MediaInfo, ClassificationError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(ClassificationError::Llm(LlmError::Api { .. })) => "api_error",
        Err(ClassificationError::Llm(LlmError::Timeout(_))) => "timeout",
        Err(ClassificationError::Llm(LlmError::Json(_))) => "parse_error",
        Err(ClassificationError::Llm(_)) => "http_error",
        Err(ClassificationError::Parse(_)) => "parse_error",
        Err(ClassificationError::MissingTitle) => "missing_title",
    }
}

/// Remove a surrounding Markdown code fence, if any.
///
/// Handles ```` ```json ```` and bare ```` ``` ```` fences; unfenced text is
/// returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

/// Parse model output into a [`MediaInfo`].
///
/// Fences are stripped first. If the remainder still is not a JSON object,
/// the outermost `{...}` span is tried.
pub fn parse_media_info(content: &str) -> Result<MediaInfo, ClassificationError> {
    let stripped = strip_code_fence(content);

    let info: MediaInfo = match serde_json::from_str(stripped) {
        Ok(info) => info,
        Err(first_err) => {
            let object = match (stripped.find('{'), stripped.rfind('}')) {
                (Some(start), Some(end)) if start < end => &stripped[start..=end],
                _ => return Err(ClassificationError::Parse(format!("{}: {}", first_err, content))),
            };
            serde_json::from_str(object)
                .map_err(|e| ClassificationError::Parse(format!("{}: {}", e, content)))?
        }
    };

    if !info.has_title() {
        return Err(ClassificationError::MissingTitle);
    }
    Ok(info)
}
