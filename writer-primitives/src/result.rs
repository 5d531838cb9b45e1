//! Outcome of one generation attempt.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a failed generation.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credential missing or left at a placeholder; nothing was sent.
    ConfigurationError,
    /// HTTP 401: the provider rejected the credential.
    Unauthorized,
    /// HTTP 403: the credential is not allowed to use this model.
    Forbidden,
    /// HTTP 400: the provider could not process the request.
    BadRequest,
    /// HTTP 429: quota or throughput exceeded.
    RateLimited,
    /// Any other non-2xx status.
    ProviderError,
    /// A 2xx response without the expected fields.
    UnexpectedResponseFormat,
    /// The request never reached the provider or no response came back.
    NetworkError,
}

impl ErrorKind {
    /// Returns a stable `snake_case` name, used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration_error",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::BadRequest => "bad_request",
            Self::RateLimited => "rate_limited",
            Self::ProviderError => "provider_error",
            Self::UnexpectedResponseFormat => "unexpected_response_format",
            Self::NetworkError => "network_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either the generated email body or a classified failure.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    /// Generated text, already trimmed.
    Success {
        /// Email body returned by the provider.
        text: String,
    },
    /// The attempt failed; `message` is shown to the user verbatim.
    Failure {
        /// Failure classification.
        kind: ErrorKind,
        /// Human-readable explanation.
        message: String,
    },
}

impl GenerationResult {
    /// Wraps generated text.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    /// Builds a failure of the supplied kind.
    #[must_use]
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Returns `true` for [`GenerationResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the generated text on success.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the failure kind, if any.
    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Text the UI renders in the content area: the email or the error message.
    #[must_use]
    pub fn display_text(&self) -> &str {
        match self {
            Self::Success { text } => text,
            Self::Failure { message, .. } => message,
        }
    }
}
