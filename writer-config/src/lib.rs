//! Configuration for the email writer.
//!
//! [`GeneratorConfig`] describes which provider to call and with which
//! credential; it is loaded from the environment and handed to the generation
//! client at construction. [`DisplayPreferences`] is the one piece of state the
//! UI shell persists between sessions.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod generator;
mod preferences;
mod provider;

pub use error::{ConfigError, ConfigResult};
pub use generator::{
    API_KEY_ENV, BASE_URL_ENV, GeneratorConfig, MODEL_ENV, PROVIDER_ENV, is_placeholder_credential,
};
pub use preferences::{
    DARK_MODE_KEY, DisplayPreferences, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
};
pub use provider::ProviderKind;
