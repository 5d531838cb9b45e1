//! Shared generation client trait and error handling.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use writer_config::ConfigError;
use writer_primitives::{ErrorKind, GenerationResult};

/// Result alias used inside adapters before conversion to [`GenerationResult`].
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Failures raised while talking to a provider.
///
/// Adapters propagate these with `?` internally and convert them exactly once,
/// at the [`TextGenerator::generate`] boundary, via
/// [`AdapterError::into_result`].
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Missing or unusable configuration; nothing was sent.
    #[error("The email generator is not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The outbound request could not be encoded or built.
    #[error("The request could not be prepared: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be built.
        reason: String,
    },

    /// No response was received.
    #[error("Could not reach {provider}: {reason}")]
    Transport {
        /// Provider display name.
        provider: &'static str,
        /// Additional context about the error.
        reason: String,
    },

    /// The provider answered with a non-2xx status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Classification of the status.
        kind: ErrorKind,
        /// User facing message, including provider detail when available.
        message: String,
    },

    /// A 2xx response that lacks the expected fields.
    #[error("Unexpected response format from {provider}: {reason}")]
    UnexpectedFormat {
        /// Provider display name.
        provider: &'static str,
        /// What was missing or malformed.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for request encoding failures.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures. The provider name is
    /// filled in by [`AdapterError::for_provider`].
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            provider: "the provider",
            reason: reason.into(),
        }
    }

    /// Convenience constructor for malformed 2xx responses.
    #[must_use]
    pub fn unexpected_format(reason: impl Into<String>) -> Self {
        Self::UnexpectedFormat {
            provider: "the provider",
            reason: reason.into(),
        }
    }

    /// Attaches the provider's display name to errors that carry one.
    #[must_use]
    pub fn for_provider(self, name: &'static str) -> Self {
        match self {
            Self::Transport { reason, .. } => Self::Transport {
                provider: name,
                reason,
            },
            Self::UnexpectedFormat { reason, .. } => Self::UnexpectedFormat {
                provider: name,
                reason,
            },
            other => other,
        }
    }

    /// Returns the [`ErrorKind`] this failure is reported as.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::ConfigurationError,
            Self::InvalidRequest { .. } => ErrorKind::BadRequest,
            Self::Transport { .. } => ErrorKind::NetworkError,
            Self::Status { kind, .. } => *kind,
            Self::UnexpectedFormat { .. } => ErrorKind::UnexpectedResponseFormat,
        }
    }

    /// Converts the error into a [`GenerationResult::Failure`].
    #[must_use]
    pub fn into_result(self) -> GenerationResult {
        GenerationResult::failure(self.kind(), self.to_string())
    }
}

impl From<ConfigError> for AdapterError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

/// Provider and model a generator talks to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorMetadata {
    provider: &'static str,
    display_name: &'static str,
    model: String,
}

impl GeneratorMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    ///
    /// The display name defaults to the provider identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            display_name: provider,
            model: model.into(),
        }
    }

    /// Sets the name used in user-facing failure messages.
    #[must_use]
    pub fn with_display_name(mut self, display_name: &'static str) -> Self {
        self.display_name = display_name;
        self
    }

    /// Returns the provider identifier (e.g., "gemini").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the name shown to users (e.g., "Gemini").
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Turns a prompt into generated text or a classified failure.
///
/// Implementations never return errors or panic for provider problems; every
/// failure is folded into [`GenerationResult::Failure`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the provider and model this generator targets.
    fn metadata(&self) -> &GeneratorMetadata;

    /// Issues one request for `prompt`.
    async fn generate(&self, prompt: &str) -> GenerationResult;
}

/// Normalizes an adapter outcome: trims successful text and logs failures.
pub(crate) fn settle(metadata: &GeneratorMetadata, outcome: AdapterResult<String>) -> GenerationResult {
    match outcome {
        Ok(text) => {
            let text = text.trim();
            debug!(
                provider = metadata.provider(),
                model = metadata.model(),
                text_len = text.len(),
                "generation succeeded"
            );
            GenerationResult::success(text)
        }
        Err(err) => {
            let err = err.for_provider(metadata.display_name());
            warn!(
                provider = metadata.provider(),
                model = metadata.model(),
                kind = %err.kind(),
                error = %err,
                "generation failed"
            );
            err.into_result()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> GeneratorMetadata {
        GeneratorMetadata::new("gemini", "gemini-2.5-flash").with_display_name("Gemini")
    }

    #[test]
    fn settle_trims_success() {
        let result = settle(&metadata(), Ok("\n  Dear Sam,\nThanks.  \n".to_owned()));
        assert_eq!(result, GenerationResult::success("Dear Sam,\nThanks."));
    }

    #[test]
    fn settle_names_provider_on_transport_errors() {
        let result = settle(&metadata(), Err(AdapterError::transport("connection refused")));
        assert_eq!(result.error_kind(), Some(ErrorKind::NetworkError));
        assert!(result.display_text().contains("Could not reach Gemini"));
        assert!(result.display_text().contains("connection refused"));
    }

    #[test]
    fn display_name_defaults_to_provider_id() {
        let metadata = GeneratorMetadata::new("chat", "gpt-4o-mini");
        assert_eq!(metadata.display_name(), "chat");
        let metadata = metadata.with_display_name("the chat provider");
        assert_eq!(metadata.provider(), "chat");
        assert_eq!(metadata.display_name(), "the chat provider");
    }

    #[test]
    fn config_errors_map_to_configuration_kind() {
        let err: AdapterError = ConfigError::PlaceholderCredential.into();
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("placeholder"));
    }
}
