use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Deserialize;

use crate::error::{Result, SpeedTypeError};

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A read-only pool of distinct words that sentences are drawn from.
pub trait WordCorpus {
    /// Number of distinct words available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw `n` distinct words without replacement.
    fn sample(&self, n: usize, rng: &mut dyn RngCore) -> Result<Vec<String>>;
}

#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    /// Load one of the word lists bundled into the binary.
    pub fn new(file_name: &str) -> Result<Self> {
        let lang = read_language_from_file(&format!("{file_name}.json"))?;
        Ok(Self::from_words(lang.name, lang.words))
    }

    /// Build a corpus from arbitrary words. Blank entries and repeats are dropped.
    pub fn from_words<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .unique()
            .collect();

        Self {
            name: name.into(),
            size: words.len() as u32,
            words,
        }
    }
}

impl WordCorpus for Language {
    fn len(&self) -> usize {
        self.words.len()
    }

    fn sample(&self, n: usize, rng: &mut dyn RngCore) -> Result<Vec<String>> {
        if n > self.words.len() {
            return Err(SpeedTypeError::InsufficientCorpus {
                requested: n,
                available: self.words.len(),
            });
        }

        Ok(self.words.choose_multiple(rng, n).cloned().collect())
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language> {
    let name = file_name.trim_end_matches(".json").to_string();

    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| SpeedTypeError::UnknownLanguage(name.clone()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| SpeedTypeError::MalformedCorpus {
            name: name.clone(),
            reason: "not valid utf-8".to_string(),
        })?;

    serde_json::from_str(file_as_str).map_err(|e| SpeedTypeError::MalformedCorpus {
        name,
        reason: e.to_string(),
    })
}
