use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::language::{Augmenter, WordCorpus, WordFormatter};

/// The target text for one test run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    words: Vec<String>,
    text: String,
}

impl Sentence {
    pub fn new(words: Vec<String>) -> Self {
        let text = words.join(" ");
        Self { words, text }
    }

    /// Split free text on whitespace, collapsing runs of spaces.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split_whitespace().map(str::to_string).collect())
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, spaces included.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Produces target sentences from a word corpus
pub struct SentenceGenerator {
    corpus: Box<dyn WordCorpus>,
    rng: StdRng,
    fixed_prompt: Option<Sentence>,
}

impl fmt::Debug for SentenceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentenceGenerator")
            .field("corpus_len", &self.corpus.len())
            .field("fixed_prompt", &self.fixed_prompt)
            .finish()
    }
}

impl SentenceGenerator {
    pub fn new(corpus: Box<dyn WordCorpus>) -> Self {
        Self {
            corpus,
            rng: StdRng::from_entropy(),
            fixed_prompt: None,
        }
    }

    /// Same as [`SentenceGenerator::new`] but reproducible.
    pub fn with_seed(corpus: Box<dyn WordCorpus>, seed: u64) -> Self {
        Self {
            corpus,
            rng: StdRng::seed_from_u64(seed),
            fixed_prompt: None,
        }
    }

    /// Always hand out `prompt` instead of sampling the corpus.
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.fixed_prompt = Some(Sentence::from_text(prompt));
        self
    }

    pub fn fixed_prompt(&self) -> Option<&Sentence> {
        self.fixed_prompt.as_ref()
    }

    /// Go back to sampling the corpus, handing back the prompt if there was one.
    pub fn release_prompt(&mut self) -> Option<Sentence> {
        self.fixed_prompt.take()
    }

    pub fn set_prompt(&mut self, prompt: Sentence) {
        self.fixed_prompt = Some(prompt);
    }

    pub fn generate(
        &mut self,
        word_count: usize,
        include_numbers: bool,
        include_punctuation: bool,
    ) -> Result<Sentence> {
        if let Some(ref prompt) = self.fixed_prompt {
            return Ok(prompt.clone());
        }

        let mut words = self.corpus.sample(word_count, &mut self.rng)?;

        Augmenter::from_flags(include_numbers, include_punctuation).format(&mut words, &mut self.rng);

        Ok(Sentence::new(words))
    }
}
