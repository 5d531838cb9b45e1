//! Generation client configuration.

use std::{env, fmt};

use tracing::debug;

use crate::{ConfigError, ConfigResult, ProviderKind};

/// Selects the provider (`gemini` or `chat`).
pub const PROVIDER_ENV: &str = "EMAIL_WRITER_PROVIDER";
/// Credential; falls back to the provider specific variable when unset.
pub const API_KEY_ENV: &str = "EMAIL_WRITER_API_KEY";
/// Model identifier override.
pub const MODEL_ENV: &str = "EMAIL_WRITER_MODEL";
/// Base URL override.
pub const BASE_URL_ENV: &str = "EMAIL_WRITER_BASE_URL";

const PLACEHOLDER_CREDENTIALS: &[&str] = &[
    "your_api_key",
    "your-api-key",
    "your_api_key_here",
    "your-api-key-here",
    "your_gemini_api_key",
    "your_openai_api_key",
    "api_key",
    "api-key",
    "changeme",
    "change_me",
    "replace_me",
    "todo",
    "xxx",
    "sk-...",
];

/// Returns `true` for blank keys and obvious template placeholders.
#[must_use]
pub fn is_placeholder_credential(key: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return true;
    }
    if key.starts_with('<') && key.ends_with('>') {
        return true;
    }
    let lowered = key.to_ascii_lowercase();
    PLACEHOLDER_CREDENTIALS.contains(&lowered.as_str())
        || key.chars().all(|ch| ch == 'x' || ch == 'X' || ch == '*')
}

/// Which provider to call, with which model and credential.
///
/// The credential is optional here. It is validated lazily through
/// [`GeneratorConfig::credential`] so that a missing key surfaces as a settled
/// failure rather than a construction error.
#[derive(Clone)]
pub struct GeneratorConfig {
    provider: ProviderKind,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeneratorConfig {
    /// Creates a configuration with the provider's default model and base URL.
    #[must_use]
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: None,
            model: provider.default_model().to_owned(),
            base_url: provider.default_base_url().to_owned(),
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider name, model or base URL is invalid. A
    /// missing credential is not an error at this point.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`GeneratorConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let provider = match non_empty(PROVIDER_ENV) {
            Some(name) => name.parse()?,
            None => ProviderKind::default(),
        };

        let mut config = Self::new(provider);
        if let Some(key) =
            non_empty(API_KEY_ENV).or_else(|| non_empty(provider.fallback_key_env()))
        {
            config = config.with_api_key(key);
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            config = config.with_model(model)?;
        }
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            config = config.with_base_url(base_url)?;
        }

        debug!(
            provider = %config.provider,
            model = %config.model,
            base_url = %config.base_url,
            has_api_key = config.api_key.is_some(),
            "loaded generator configuration"
        );
        Ok(config)
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the model identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyModel`] for a blank identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> ConfigResult<Self> {
        let model = model.into().trim().to_owned();
        if model.is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        self.model = model;
        Ok(self)
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the URL starts with
    /// `http://` or `https://` and names a host.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> ConfigResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Returns the selected provider.
    #[must_use]
    pub const fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the credential if it is present and not a placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] or
    /// [`ConfigError::PlaceholderCredential`].
    pub fn credential(&self) -> ConfigResult<&str> {
        match self.api_key.as_deref() {
            None => Err(ConfigError::MissingCredential { env: API_KEY_ENV }),
            Some(key) if is_placeholder_credential(key) => {
                Err(ConfigError::PlaceholderCredential)
            }
            Some(key) => Ok(key.trim()),
        }
    }
}

fn sanitize_base_url(input: &str) -> ConfigResult<String> {
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: input.to_owned(),
        reason: reason.to_owned(),
    };

    let mut base = input.trim().to_owned();
    let Some(rest) = base
        .strip_prefix("https://")
        .or_else(|| base.strip_prefix("http://"))
    else {
        return Err(invalid("must start with http:// or https://"));
    };
    if rest.is_empty() || rest.starts_with('/') {
        return Err(invalid("missing host"));
    }
    if rest.contains(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_gemini_without_key() {
        let config = GeneratorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.provider(), ProviderKind::Gemini);
        assert_eq!(config.model(), "gemini-2.5-flash");
        assert!(matches!(
            config.credential(),
            Err(ConfigError::MissingCredential { .. })
        ));
    }

    #[test]
    fn reads_chat_provider_with_fallback_key() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (PROVIDER_ENV, "chat"),
            ("OPENAI_API_KEY", "sk-live-123"),
            (MODEL_ENV, "gpt-4o"),
            (BASE_URL_ENV, "https://openrouter.ai/api"),
        ]))
        .unwrap();

        assert_eq!(config.provider(), ProviderKind::ChatCompletions);
        assert_eq!(config.credential().unwrap(), "sk-live-123");
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.base_url(), "https://openrouter.ai/api/");
    }

    #[test]
    fn explicit_key_wins_over_fallback() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "primary"),
            ("GEMINI_API_KEY", "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.credential().unwrap(), "primary");
    }

    #[test]
    fn placeholder_keys_are_rejected() {
        for key in ["", "  ", "your_api_key_here", "YOUR-API-KEY", "<api key>", "xxxxxxxx"] {
            let config = GeneratorConfig::new(ProviderKind::Gemini).with_api_key(key);
            assert!(config.credential().is_err(), "{key:?} should be rejected");
        }
        assert!(!is_placeholder_credential("AIzaRealLookingKey"));
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = GeneratorConfig::new(ProviderKind::ChatCompletions)
            .with_base_url("api.openai.com")
            .expect_err("missing scheme should error");
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = GeneratorConfig::new(ProviderKind::Gemini)
            .with_base_url("http://127.0.0.1:8080")
            .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = GeneratorConfig::new(ProviderKind::Gemini).with_api_key("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn blank_model_is_rejected() {
        let err = GeneratorConfig::new(ProviderKind::Gemini)
            .with_model("  ")
            .expect_err("blank model");
        assert!(matches!(err, ConfigError::EmptyModel));
    }
}
