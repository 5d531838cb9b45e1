//! Provider selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which upstream request shape the generation client speaks.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Direct content-generation endpoint (`generateContent`).
    #[default]
    Gemini,
    /// OpenAI-compatible chat-completions gateway.
    ChatCompletions,
}

impl ProviderKind {
    /// Returns the provider identifier used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::ChatCompletions => "chat",
        }
    }

    /// Base URL used when none is configured.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/",
            Self::ChatCompletions => "https://api.openai.com/",
        }
    }

    /// Model used when none is configured.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::ChatCompletions => "gpt-4o-mini",
        }
    }

    /// Provider specific environment variable consulted for the key.
    #[must_use]
    pub const fn fallback_key_env(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::ChatCompletions => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "chat" | "openai" | "chat_completions" | "chat-completions" => {
                Ok(Self::ChatCompletions)
            }
            _ => Err(ConfigError::UnknownProvider {
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(
            "openai".parse::<ProviderKind>().unwrap(),
            ProviderKind::ChatCompletions
        );
        assert_eq!(
            " chat ".parse::<ProviderKind>().unwrap(),
            ProviderKind::ChatCompletions
        );
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "llama".parse::<ProviderKind>().expect_err("unknown");
        assert!(matches!(err, ConfigError::UnknownProvider { .. }));
    }
}
