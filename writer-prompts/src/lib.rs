//! Prompt construction for the email writer.
//!
//! [`build_prompt`] turns the user's raw thoughts, the selected tone and an
//! optional email being replied to into the instruction text sent to the
//! provider. Rendering goes through [`PromptTemplate`], a small single-pass
//! `{{variable}}` substitution engine.

#![warn(missing_docs, clippy::pedantic)]

pub mod email;
pub mod template;

pub use email::{EMAIL_TEMPLATE, build_prompt, build_prompt_for};
pub use template::PromptTemplate;
