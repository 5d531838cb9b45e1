//! Email prompt built from raw thoughts, tone and optional reply context.

use tracing::debug;
use writer_primitives::{GenerationRequest, Tone};

use crate::PromptTemplate;

/// Instruction template sent to the provider.
pub const EMAIL_TEMPLATE: &str = "You are an expert email writer. Transform the following raw thoughts into a well-crafted email with a {{tone}} tone.

Raw thoughts: \"{{raw_thoughts}}\"{{context}}

Instructions:
- Write a complete, professional email body
- Use a {{tone}} tone throughout
- Make it clear, engaging, and well-structured
- Ensure proper email etiquette
- Do not include a subject line
- Respond with ONLY the email body content. Do not include any explanations or additional text outside of the email.";

/// Builds the prompt text.
///
/// `raw_thoughts` and `context_email` are embedded verbatim. The reply block is
/// only added when `context_email` is non-blank. Blank `raw_thoughts` are not
/// rejected here; callers validate input first.
#[must_use]
pub fn build_prompt(raw_thoughts: &str, tone: Tone, context_email: Option<&str>) -> String {
    let context = context_email
        .filter(|text| !text.trim().is_empty())
        .map(reply_block)
        .unwrap_or_default();

    let prompt = PromptTemplate::new(EMAIL_TEMPLATE).render(&[
        ("tone", tone.as_str()),
        ("raw_thoughts", raw_thoughts),
        ("context", context.as_str()),
    ]);

    debug!(
        %tone,
        has_context = !context.is_empty(),
        prompt_len = prompt.len(),
        "built email prompt"
    );
    prompt
}

/// Builds the prompt for a [`GenerationRequest`].
#[must_use]
pub fn build_prompt_for(request: &GenerationRequest) -> String {
    build_prompt(
        request.raw_thoughts(),
        request.tone(),
        request.context_email(),
    )
}

fn reply_block(context_email: &str) -> String {
    format!("\n\nContext - I am responding to this email:\n\"{context_email}\"\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY_MARKER: &str = "I am responding to this email";

    #[test]
    fn embeds_tone_and_thoughts_verbatim() {
        for tone in Tone::ALL {
            let prompt = build_prompt("ask for a raise, mention Q3 numbers", tone, None);
            assert!(prompt.contains("ask for a raise, mention Q3 numbers"));
            assert!(prompt.contains(&format!("with a {tone} tone")));
            assert!(prompt.contains(&format!("Use a {tone} tone throughout")));
        }
    }

    #[test]
    fn blank_context_omits_reply_block() {
        for context in [None, Some(""), Some("   "), Some("\n\t")] {
            let prompt = build_prompt("decline the meeting", Tone::Formal, context);
            assert!(!prompt.contains(REPLY_MARKER));
            assert!(prompt.contains("Raw thoughts: \"decline the meeting\"\n\nInstructions:"));
        }
    }

    #[test]
    fn non_blank_context_is_quoted_verbatim() {
        let context = "Hi,\nCan you present on {{Friday}}?\n- Sam";
        let prompt = build_prompt("yes but only 10 minutes", Tone::Warm, Some(context));
        assert!(prompt.contains(REPLY_MARKER));
        assert!(prompt.contains(&format!("\"{context}\"")));
    }

    #[test]
    fn reply_block_sits_between_thoughts_and_instructions() {
        let prompt = build_prompt("accept", Tone::Concise, Some("Lunch Tuesday?"));
        assert!(prompt.contains(
            "Raw thoughts: \"accept\"\n\nContext - I am responding to this email:\n\"Lunch Tuesday?\"\n\n\n\nInstructions:"
        ));
    }

    #[test]
    fn asks_for_body_only() {
        let prompt = build_prompt("follow up", Tone::Concise, None);
        assert!(prompt.contains("Do not include a subject line"));
        assert!(prompt.contains("Respond with ONLY the email body content"));
    }

    #[test]
    fn whitespace_thoughts_still_build() {
        let prompt = build_prompt("   ", Tone::Casual, None);
        assert!(prompt.contains("Raw thoughts: \"   \""));
    }

    #[test]
    fn request_helper_matches_direct_call() {
        let request = GenerationRequest::new("thank the team", Tone::Warm)
            .unwrap()
            .with_context_email("Great launch!");
        assert_eq!(
            build_prompt_for(&request),
            build_prompt("thank the team", Tone::Warm, Some("Great launch!"))
        );
    }
}
