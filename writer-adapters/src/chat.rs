//! Chat-completions adapter for OpenAI-compatible gateways.

use std::fmt;

use async_trait::async_trait;
use hyper::Uri;
use hyper::header::{AUTHORIZATION, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;
use writer_config::GeneratorConfig;
use writer_primitives::GenerationResult;

use crate::classify::classify_status;
use crate::http_client::{HyperClient, build_https_client, post_json};
use crate::traits::{AdapterError, AdapterResult, GeneratorMetadata, TextGenerator, settle};

/// Adapter for `POST {base}v1/chat/completions` with bearer authentication.
pub struct ChatCompletionsAdapter {
    client: HyperClient,
    endpoint: Uri,
    metadata: GeneratorMetadata,
    config: GeneratorConfig,
}

impl fmt::Debug for ChatCompletionsAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionsAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the endpoint URI is invalid.
    pub fn new(config: GeneratorConfig) -> AdapterResult<Self> {
        let metadata =
            GeneratorMetadata::new("chat", config.model()).with_display_name("the chat provider");
        let endpoint = format!("{}v1/chat/completions", config.base_url())
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid chat completions endpoint: {err}"))
            })?;

        let client = build_https_client()?;

        Ok(Self {
            client,
            endpoint,
            metadata,
            config,
        })
    }

    /// Returns the fully qualified endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: self.metadata.model(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        }
    }

    async fn request_text(&self, prompt: &str) -> AdapterResult<String> {
        let key = self.config.credential()?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
            AdapterError::configuration("API key contains characters not allowed in a header")
        })?;

        debug!(
            endpoint = %self.endpoint,
            model = self.metadata.model(),
            prompt_len = prompt.len(),
            "sending chat completion request"
        );
        let response = post_json(
            &self.client,
            &self.endpoint,
            &[(AUTHORIZATION, bearer)],
            &self.build_request(prompt),
        )
        .await?;
        debug!(status = %response.status, "chat completion responded");

        if !response.status.is_success() {
            return Err(classify_status(
                "The chat provider",
                response.status,
                &response.body,
            ));
        }

        extract_text(&response.body)
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsAdapter {
    fn metadata(&self) -> &GeneratorMetadata {
        &self.metadata
    }

    async fn generate(&self, prompt: &str) -> GenerationResult {
        settle(&self.metadata, self.request_text(prompt).await)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Reads `choices[0].message.content`.
fn extract_text(body: &[u8]) -> AdapterResult<String> {
    let response: ChatCompletionResponse = serde_json::from_slice(body).map_err(|err| {
        AdapterError::unexpected_format(format!("could not decode response body: {err}"))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| AdapterError::unexpected_format("missing choices[0].message.content"))
}
