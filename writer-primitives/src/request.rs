//! User input for a single generation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Tone};

/// Raw thoughts, tone and optional email being replied to.
///
/// [`GenerationRequest::new`] rejects blank thoughts. Values deserialized from
/// a UI shell skip that check, so consumers should still consult
/// [`GenerationRequest::is_blank`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    raw_thoughts: String,
    #[serde(default)]
    tone: Tone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context_email: Option<String>,
}

impl GenerationRequest {
    /// Creates a request from the user's raw thoughts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankThoughts`] if `raw_thoughts` is empty after trimming.
    pub fn new(raw_thoughts: impl Into<String>, tone: Tone) -> Result<Self> {
        let raw_thoughts = raw_thoughts.into();
        if raw_thoughts.trim().is_empty() {
            return Err(Error::BlankThoughts);
        }

        Ok(Self {
            raw_thoughts,
            tone,
            context_email: None,
        })
    }

    /// Attaches the email being replied to. Blank context is dropped.
    #[must_use]
    pub fn with_context_email(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context_email = (!context.trim().is_empty()).then_some(context);
        self
    }

    /// Returns the raw thoughts exactly as entered.
    #[must_use]
    pub fn raw_thoughts(&self) -> &str {
        &self.raw_thoughts
    }

    /// Returns the selected tone.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        self.tone
    }

    /// Returns the email being replied to, if any.
    #[must_use]
    pub fn context_email(&self) -> Option<&str> {
        self.context_email.as_deref()
    }

    /// Returns `true` when the raw thoughts are empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.raw_thoughts.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_whitespace_thoughts() {
        let err = GenerationRequest::new(" \n\t", Tone::Warm).expect_err("blank");
        assert!(matches!(err, Error::BlankThoughts));
    }

    #[test]
    fn keeps_thoughts_verbatim() {
        let request = GenerationRequest::new("  need Friday off ", Tone::Casual).unwrap();
        assert_eq!(request.raw_thoughts(), "  need Friday off ");
        assert_eq!(request.tone(), Tone::Casual);
        assert!(request.context_email().is_none());
    }

    #[test]
    fn blank_context_is_dropped() {
        let request = GenerationRequest::new("thanks", Tone::Warm)
            .unwrap()
            .with_context_email("   ");
        assert!(request.context_email().is_none());

        let request = request.with_context_email("Hi, can you join?");
        assert_eq!(request.context_email(), Some("Hi, can you join?"));
    }

    #[test]
    fn deserialized_requests_can_be_blank() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"rawThoughts":"   ","tone":"formal"}"#).unwrap();
        assert!(request.is_blank());
        assert_eq!(request.tone(), Tone::Formal);
    }
}
