//! Content-generation adapter (Gemini `generateContent`).

use std::fmt;

use async_trait::async_trait;
use hyper::Uri;
use hyper::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;
use writer_config::GeneratorConfig;
use writer_primitives::GenerationResult;

use crate::classify::classify_status;
use crate::http_client::{HyperClient, build_https_client, post_json};
use crate::traits::{AdapterError, AdapterResult, GeneratorMetadata, TextGenerator, settle};

fn api_key_header() -> HeaderName {
    HeaderName::from_static("x-goog-api-key")
}

/// Adapter for the `v1/models/{model}:generateContent` endpoint.
///
/// The credential travels in the `x-goog-api-key` header so it never appears
/// in request URIs or logs.
pub struct GeminiAdapter {
    client: HyperClient,
    endpoint: Uri,
    metadata: GeneratorMetadata,
    config: GeneratorConfig,
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// A missing credential is not checked here; it surfaces from
    /// [`TextGenerator::generate`] as a configuration failure.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the endpoint URI is invalid.
    pub fn new(config: GeneratorConfig) -> AdapterResult<Self> {
        let metadata = GeneratorMetadata::new("gemini", config.model()).with_display_name("Gemini");
        let endpoint = format!(
            "{}v1/models/{}:generateContent",
            config.base_url(),
            config.model()
        )
        .parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid Gemini endpoint: {err}")))?;

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

    async fn request_text(&self, prompt: &str) -> AdapterResult<String> {
        let key = self.config.credential()?;
        let key = HeaderValue::from_str(key).map_err(|_| {
            AdapterError::configuration("API key contains characters not allowed in a header")
        })?;

        debug!(
            endpoint = %self.endpoint,
            prompt_len = prompt.len(),
            "sending Gemini request"
        );
        let response = post_json(
            &self.client,
            &self.endpoint,
            &[(api_key_header(), key)],
            &build_request(prompt),
        )
        .await?;
        debug!(status = %response.status, "Gemini responded");

        if !response.status.is_success() {
            return Err(classify_status("Gemini", response.status, &response.body));
        }

        extract_text(&response.body)
    }
}

#[async_trait]
impl TextGenerator for GeminiAdapter {
    fn metadata(&self) -> &GeneratorMetadata {
        &self.metadata
    }

    async fn generate(&self, prompt: &str) -> GenerationResult {
        settle(&self.metadata, self.request_text(prompt).await)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn build_request(prompt: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
    }
}

/// Reads `candidates[0].content.parts[0].text`.
fn extract_text(body: &[u8]) -> AdapterResult<String> {
    let response: GenerateContentResponse = serde_json::from_slice(body).map_err(|err| {
        AdapterError::unexpected_format(format!("could not decode response body: {err}"))
    })?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
        .filter(|_| response.candidates.is_empty())
    {
        return Err(AdapterError::unexpected_format(format!(
            "no candidates returned (prompt blocked: {reason})"
        )));
    }

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| {
            AdapterError::unexpected_format("missing candidates[0].content.parts[0].text")
        })
}
