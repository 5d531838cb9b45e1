//! Configuration error definitions.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No credential was supplied.
    #[error("no API key configured; set {env} or supply one explicitly")]
    MissingCredential {
        /// Environment variable consulted for the key.
        env: &'static str,
    },

    /// The credential is still a template placeholder.
    #[error("the configured API key is a placeholder; replace it with a real key")]
    PlaceholderCredential,

    /// The provider name is not recognised.
    #[error("unknown provider `{value}`; expected `gemini` or `chat`")]
    UnknownProvider {
        /// The offending provider name.
        value: String,
    },

    /// The base URL failed validation.
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The model identifier is empty.
    #[error("model identifier must not be empty")]
    EmptyModel,

    /// Reading or writing the preference file failed.
    #[error("preference file {path}: {source}")]
    PreferenceIo {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The preference file is not valid JSON.
    #[error("preference file {path} is malformed: {source}")]
    PreferenceFormat {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}
