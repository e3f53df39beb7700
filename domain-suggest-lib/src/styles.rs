//! Style catalog.
//!
//! A style is a named tone preset. It controls two things: the instruction
//! fragment embedded in the generation prompt, and the affix templates the
//! fallback generator wraps around the idea's seed word.

use crate::error::SuggestError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named tone presets for generated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Universal, brandable names
    #[default]
    Default,
    /// Moroccan flavour (Darija/Arabic elements)
    Moroccan,
    /// Corporate, B2B-oriented names
    Professional,
    /// Wordplay and humor
    Funny,
}

/// A prefix/suffix pair wrapped around the seed word: `{prefix}{seed}{suffix}`.
pub type AffixTemplate = (&'static str, &'static str);

const DEFAULT_AFFIXES: &[AffixTemplate] = &[
    ("", ""),
    ("my", ""),
    ("", "hub"),
    ("", "zone"),
    ("go", ""),
    ("", "app"),
    ("best", ""),
    ("", "now"),
    ("top", ""),
    ("new", ""),
    ("", "web"),
    ("smart", ""),
];

const MOROCCAN_AFFIXES: &[AffixTemplate] = &[
    ("dar", ""),
    ("souk", ""),
    ("atlas", ""),
    ("casa", ""),
    ("maroc", ""),
    ("medina", ""),
    ("riad", ""),
    ("fes", ""),
    ("rabat", ""),
    ("agadir", ""),
    ("tanger", ""),
    ("sahara", ""),
];

const PROFESSIONAL_AFFIXES: &[AffixTemplate] = &[
    ("", "pro"),
    ("", "solutions"),
    ("global", ""),
    ("", "group"),
    ("elite", ""),
    ("", "corp"),
    ("prime", ""),
    ("", "systems"),
    ("apex", ""),
    ("", "enterprise"),
    ("summit", ""),
    ("nexus", ""),
];

const FUNNY_AFFIXES: &[AffixTemplate] = &[
    ("", "ify"),
    ("super", ""),
    ("", "mania"),
    ("mega", ""),
    ("", "zilla"),
    ("ultra", ""),
    ("", "rama"),
    ("crazy", ""),
    ("", "tastic"),
    ("epic", ""),
    ("", "boom"),
    ("wild", ""),
];

impl Style {
    /// Every style in catalog order.
    pub const ALL: [Style; 4] = [
        Style::Default,
        Style::Moroccan,
        Style::Professional,
        Style::Funny,
    ];

    /// Resolve a style key (case-insensitive). An empty key selects `Default`.
    ///
    /// `pro` is accepted as an alias of `professional`.
    pub fn from_key(key: &str) -> Result<Self, SuggestError> {
        match key.trim().to_lowercase().as_str() {
            "" | "default" => Ok(Style::Default),
            "moroccan" => Ok(Style::Moroccan),
            "professional" | "pro" => Ok(Style::Professional),
            "funny" => Ok(Style::Funny),
            other => Err(SuggestError::invalid_request(
                "style",
                format!(
                    "unknown style '{}', must be one of {}",
                    other,
                    available_styles().join(", ")
                ),
            )),
        }
    }

    /// Catalog key of this style.
    pub fn key(&self) -> &'static str {
        match self {
            Style::Default => "default",
            Style::Moroccan => "moroccan",
            Style::Professional => "professional",
            Style::Funny => "funny",
        }
    }

    /// Instruction fragment embedded verbatim in the generation prompt.
    pub fn prompt_fragment(&self) -> &'static str {
        match self {
            Style::Default => {
                "Generate creative, brandable domains with universal appeal. \
                 Focus on memorability and professional sound. \
                 Mix short punchy names with descriptive options."
            }
            Style::Moroccan => {
                "Generate domains with authentic Moroccan flair, using Darija or Arabic elements \
                 that are DIRECTLY a good fit for the business idea. Avoid generic cultural terms \
                 like city names (Casablanca, Rabat) or broad terms (Atlas, Sahara) unless they \
                 are highly relevant to the business concept. Instead, weave Moroccan art, \
                 craftsmanship, or conceptual words into the name. For example, for a \
                 tech company, 'ZellijTech' or 'FeziaCode' is better than 'MarocTech'. \
                 Focus on creative, relevant blending."
            }
            Style::Professional => {
                "Create formal, corporate-style domains suitable for B2B and enterprise. \
                 Use terms like: Solutions, Global, Pro, Enterprise, Systems, Group. \
                 Focus on credibility and industry authority. \
                 Avoid casual or playful elements."
            }
            Style::Funny => {
                "Generate clever, memorable domains with wordplay and humor. \
                 Use puns, rhymes, and creative combinations when appropriate. \
                 Keep it professional enough for business use. \
                 Balance wit with brandability."
            }
        }
    }

    /// Affix templates used by the fallback generator, in emission order.
    pub fn affixes(&self) -> &'static [AffixTemplate] {
        match self {
            Style::Default => DEFAULT_AFFIXES,
            Style::Moroccan => MOROCCAN_AFFIXES,
            Style::Professional => PROFESSIONAL_AFFIXES,
            Style::Funny => FUNNY_AFFIXES,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Get available style keys.
///
/// Useful for CLI help text and validation.
pub fn available_styles() -> Vec<&'static str> {
    Style::ALL.iter().map(|s| s.key()).collect()
}
