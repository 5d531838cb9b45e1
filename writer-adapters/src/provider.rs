//! Adapter selection by configuration.

use std::sync::Arc;

use tracing::info;
use writer_config::{GeneratorConfig, ProviderKind};

use crate::chat::ChatCompletionsAdapter;
use crate::gemini::GeminiAdapter;
use crate::traits::{AdapterResult, TextGenerator};

/// Builds the generator named by `config.provider()`.
///
/// # Errors
///
/// Returns [`AdapterError::Configuration`](crate::traits::AdapterError::Configuration)
/// when the endpoint cannot be formed. Credentials are validated per request.
pub fn connect(config: GeneratorConfig) -> AdapterResult<Arc<dyn TextGenerator>> {
    let provider = config.provider();
    let generator: Arc<dyn TextGenerator> = match provider {
        ProviderKind::Gemini => Arc::new(GeminiAdapter::new(config)?),
        ProviderKind::ChatCompletions => Arc::new(ChatCompletionsAdapter::new(config)?),
    };

    let metadata = generator.metadata();
    info!(
        provider = metadata.provider(),
        model = metadata.model(),
        "generation client ready"
    );
    Ok(generator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_adapter_by_provider() {
        let gemini = connect(GeneratorConfig::new(ProviderKind::Gemini)).unwrap();
        assert_eq!(gemini.metadata().provider(), "gemini");
        assert_eq!(gemini.metadata().model(), "gemini-2.5-flash");

        let chat = connect(GeneratorConfig::new(ProviderKind::ChatCompletions)).unwrap();
        assert_eq!(chat.metadata().provider(), "chat");
    }

    #[test]
    fn invalid_model_in_path_is_configuration_error() {
        let config = GeneratorConfig::new(ProviderKind::Gemini)
            .with_model("bad model")
            .unwrap();
        let Err(err) = connect(config) else {
            panic!("a space is not valid in the endpoint path");
        };
        assert_eq!(err.kind(), writer_primitives::ErrorKind::ConfigurationError);
    }
}
