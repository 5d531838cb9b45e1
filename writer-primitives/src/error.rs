//! Shared error definitions for writer primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used by the primitive constructors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building primitive values.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw thoughts were empty or whitespace only.
    #[error("raw thoughts must not be blank")]
    BlankThoughts,

    /// The supplied tone name is not one of the fixed presets.
    #[error("unknown tone `{value}`; expected one of: {expected}")]
    UnknownTone {
        /// The offending tone name.
        value: String,
        /// Comma separated list of accepted names.
        expected: String,
    },

    /// The provided request identifier could not be parsed.
    #[error("invalid request id: {source}")]
    InvalidRequestId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },
}
