//! Email writer SDK facade.
//!
//! Bundles the workspace crates behind feature flags. A typical shell loads a
//! [`config::GeneratorConfig`], builds a generator with
//! [`adapters::connect`], wraps it in a [`kernel::RequestController`] and
//! renders whatever the controller's snapshot holds.

#![warn(missing_docs, clippy::pedantic)]

/// Shared types: tones, requests, results.
pub use writer_primitives as primitives;

/// Prompt builder (enabled by `prompts` feature).
#[cfg(feature = "prompts")]
pub use writer_prompts as prompts;

/// Provider adapters (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use writer_adapters as adapters;

/// Configuration and display preferences (enabled by `config` feature).
#[cfg(feature = "config")]
pub use writer_config as config;

/// Request state controller (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use writer_kernel as kernel;

/// Logging bootstrap (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use writer_telemetry as telemetry;
