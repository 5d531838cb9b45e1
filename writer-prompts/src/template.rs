//! Single-pass prompt template with `{{variable}}` substitution.

use std::fmt;

use tracing::trace;

/// A prompt template with `{{variable}}` placeholders.
///
/// Values are inserted in one pass over the template, so a value that itself
/// contains `{{...}}` is emitted verbatim and never expanded. Placeholders
/// without a value are left in place.
///
/// # Examples
///
/// ```
/// use writer_prompts::PromptTemplate;
///
/// let template = PromptTemplate::new("Write with a {{tone}} tone.");
/// assert_eq!(template.render(&[("tone", "warm")]), "Write with a warm tone.");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Creates a template from the supplied text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the placeholder names in order of appearance, duplicates included.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(((_, name, _), after)) = next_placeholder(rest) {
            names.push(name);
            rest = after;
        }
        names
    }

    /// Renders the template, substituting each placeholder from `vars`.
    #[must_use]
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(((literal, name, raw), after)) = next_placeholder(rest) {
            out.push_str(literal);
            match vars.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => out.push_str(value),
                None => {
                    trace!(placeholder = name, "leaving unresolved placeholder");
                    out.push_str(raw);
                }
            }
            rest = after;
        }

        out.push_str(rest);
        out
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Splits `input` at the next `{{name}}` placeholder.
///
/// Returns `((literal_before, trimmed_name, raw_placeholder), remainder)`.
fn next_placeholder(input: &str) -> Option<((&str, &str, &str), &str)> {
    let start = input.find("{{")?;
    let close = input[start + 2..].find("}}")? + start + 2;
    let name = input[start + 2..close].trim();
    Some((
        (&input[..start], name, &input[start..close + 2]),
        &input[close + 2..],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_multiple_variables() {
        let template = PromptTemplate::new("{{greeting}} {{ name }}, {{greeting}} again");
        let rendered = template.render(&[("greeting", "Hello"), ("name", "Alice")]);
        assert_eq!(rendered, "Hello Alice, Hello again");
    }

    #[test]
    fn values_are_not_expanded_twice() {
        let template = PromptTemplate::new("A: {{a}} B: {{b}}");
        let rendered = template.render(&[("a", "{{b}}"), ("b", "bee")]);
        assert_eq!(rendered, "A: {{b}} B: bee");
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let template = PromptTemplate::new("Hi {{name}} from {{team}}");
        assert_eq!(template.render(&[("name", "Bo")]), "Hi Bo from {{team}}");
    }

    #[test]
    fn unterminated_braces_are_literal() {
        let template = PromptTemplate::new("Code: {{oops");
        assert_eq!(template.render(&[("oops", "x")]), "Code: {{oops");
        assert!(template.placeholders().is_empty());
    }

    #[test]
    fn lists_placeholders_in_order() {
        let template = PromptTemplate::new("{{tone}} {{raw}} {{tone}}");
        assert_eq!(template.placeholders(), vec!["tone", "raw", "tone"]);
    }
}
