//! Tone presets offered to the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the six fixed tones the prompt can ask for.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Clear and business-appropriate.
    #[default]
    Professional,
    /// Friendly and approachable.
    Warm,
    /// Brief and to the point.
    Concise,
    /// Traditional and respectful.
    Formal,
    /// Relaxed and conversational.
    Casual,
    /// Compelling and convincing.
    Persuasive,
}

impl Tone {
    /// Every tone, in the order the UI presents them.
    pub const ALL: [Self; 6] = [
        Self::Professional,
        Self::Warm,
        Self::Concise,
        Self::Formal,
        Self::Casual,
        Self::Persuasive,
    ];

    /// Returns the lowercase name embedded in prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Warm => "warm",
            Self::Concise => "concise",
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::Persuasive => "persuasive",
        }
    }

    /// Returns the label shown on the tone picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Warm => "Warm",
            Self::Concise => "Concise",
            Self::Formal => "Formal",
            Self::Casual => "Casual",
            Self::Persuasive => "Persuasive",
        }
    }

    /// Returns the one-line description shown under the label.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Professional => "Clear and business-appropriate",
            Self::Warm => "Friendly and approachable",
            Self::Concise => "Brief and to the point",
            Self::Formal => "Traditional and respectful",
            Self::Casual => "Relaxed and conversational",
            Self::Persuasive => "Compelling and convincing",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownTone {
                value: s.to_owned(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Persuasive".parse::<Tone>().unwrap(), Tone::Persuasive);
        assert_eq!(" warm ".parse::<Tone>().unwrap(), Tone::Warm);
    }

    #[test]
    fn unknown_tone_lists_choices() {
        let err = "snarky".parse::<Tone>().expect_err("not a preset");
        let message = err.to_string();
        assert!(message.contains("snarky"));
        assert!(message.contains("professional, warm, concise, formal, casual, persuasive"));
    }

    #[test]
    fn wire_names_round_trip_through_serde() {
        for tone in Tone::ALL {
            let json = serde_json::to_string(&tone).unwrap();
            assert_eq!(json, format!("\"{}\"", tone.as_str()));
        }
    }

    #[test]
    fn defaults_to_professional() {
        assert_eq!(Tone::default(), Tone::Professional);
    }
}
