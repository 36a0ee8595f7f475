pub mod core;
pub mod formatter;

// Re-export the main types for convenience
pub use self::core::{Language, WordCorpus};
pub use formatter::{
    Augmenter, NumberFormatter, PunctuationFormatter, WordFormatter, PUNCTUATION_MARKS,
};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Word lists bundled with the binary
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SupportedLanguage {
    #[default]
    English,
    EnglishShort,
}

impl SupportedLanguage {
    pub fn as_lang(&self) -> Result<Language> {
        Language::new(&self.to_string())
    }
}
