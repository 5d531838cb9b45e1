//! Structured logging bootstrap.
//!
//! Libraries in this workspace only emit `tracing` events. Binaries call
//! [`init`] (or [`TelemetryConfig::try_init`]) once at startup to install a
//! `fmt` subscriber filtered by `RUST_LOG`.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {reason}")]
    Install {
        /// Reason reported by `tracing-subscriber`.
        reason: String,
    },
}

/// Subscriber options.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    default_directive: String,
    with_target: bool,
    ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_directive: DEFAULT_DIRECTIVE.to_owned(),
            with_target: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Sets the filter applied when `RUST_LOG` is unset.
    #[must_use]
    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }

    /// Includes event targets (module paths) in output.
    #[must_use]
    pub const fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Enables or disables ANSI colours.
    #[must_use]
    pub const fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// Builds the filter: `RUST_LOG` if set and valid, else the default directive.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] if the default directive is invalid.
    pub fn filter(&self) -> Result<EnvFilter, TelemetryError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.default_directive).map_err(|err| TelemetryError::InvalidFilter {
            directive: self.default_directive.clone(),
            reason: err.to_string(),
        })
    }

    /// Installs the global `fmt` subscriber.
    ///
    /// # Errors
    ///
    /// Fails if the filter is invalid or a subscriber is already installed.
    pub fn try_init(&self) -> Result<(), TelemetryError> {
        tracing_subscriber::fmt()
            .with_env_filter(self.filter()?)
            .with_target(self.with_target)
            .with_ansi(self.ansi)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| TelemetryError::Install {
                reason: err.to_string(),
            })
    }
}

/// Installs a subscriber with the supplied default directive.
///
/// # Errors
///
/// See [`TelemetryConfig::try_init`].
pub fn init(default_directive: &str) -> Result<(), TelemetryError> {
    TelemetryConfig::default()
        .with_default_directive(default_directive)
        .try_init()
}
