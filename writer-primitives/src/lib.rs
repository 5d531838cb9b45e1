//! Core shared types for the email writer.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod request;
mod result;
mod tone;

/// Error type and result alias for primitive validation.
pub use error::{Error, Result};
/// Identifier assigned to each accepted submission.
pub use ids::RequestId;
/// User input collected by the UI shell.
pub use request::GenerationRequest;
/// Outcome of one generation attempt.
pub use result::{ErrorKind, GenerationResult};
/// Fixed tone presets.
pub use tone::Tone;
