use rand::{Rng, RngCore};

/// Marks that punctuation augmentation may append to a word.
pub const PUNCTUATION_MARKS: [char; 5] = [':', '.', ',', '!', ';'];

/// Share of words that receive an augmentation draw.
const AUGMENT_RATIO_DIVISOR: usize = 5;

/// Trait for word augmentation strategies
pub trait WordFormatter {
    /// Rewrite the sampled words in place.
    fn format(&self, words: &mut [String], rng: &mut dyn RngCore);
}

/// Appends one punctuation mark to roughly a fifth of the words
pub struct PunctuationFormatter;

impl WordFormatter for PunctuationFormatter {
    fn format(&self, words: &mut [String], rng: &mut dyn RngCore) {
        let marks = draw_suffixes(words.len(), rng, |rng| {
            PUNCTUATION_MARKS[rng.gen_range(0..PUNCTUATION_MARKS.len())]
        });
        append_suffixes(words, marks);
    }
}

/// Appends one digit to roughly a fifth of the words
pub struct NumberFormatter;

impl WordFormatter for NumberFormatter {
    fn format(&self, words: &mut [String], rng: &mut dyn RngCore) {
        let digits = draw_suffixes(words.len(), rng, |rng| {
            (b'0' + rng.gen_range(0..10u8)) as char
        });
        append_suffixes(words, digits);
    }
}

/// `floor(n * 0.2)` index draws with repetition; a repeated index keeps
/// only the last suffix drawn for it.
fn draw_suffixes(
    count: usize,
    rng: &mut dyn RngCore,
    mut pick: impl FnMut(&mut dyn RngCore) -> char,
) -> Vec<Option<char>> {
    let mut suffixes = vec![None; count];
    for _ in 0..count / AUGMENT_RATIO_DIVISOR {
        let idx = rng.gen_range(0..count);
        suffixes[idx] = Some(pick(&mut *rng));
    }
    suffixes
}

fn append_suffixes(words: &mut [String], suffixes: Vec<Option<char>>) {
    for (word, suffix) in words.iter_mut().zip(suffixes) {
        if let Some(c) = suffix {
            word.push(c);
        }
    }
}

/// Runs formatters in sequence. Punctuation goes before numbers so a word
/// hit by both passes reads `word.7`.
pub struct Augmenter {
    formatters: Vec<Box<dyn WordFormatter>>,
}

impl Default for Augmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Augmenter {
    pub fn new() -> Self {
        Self {
            formatters: Vec::new(),
        }
    }

    pub fn add_formatter(mut self, formatter: Box<dyn WordFormatter>) -> Self {
        self.formatters.push(formatter);
        self
    }

    pub fn from_flags(include_numbers: bool, include_punctuation: bool) -> Self {
        let mut augmenter = Augmenter::new();
        if include_punctuation {
            augmenter = augmenter.add_formatter(Box::new(PunctuationFormatter));
        }
        if include_numbers {
            augmenter = augmenter.add_formatter(Box::new(NumberFormatter));
        }
        augmenter
    }
}

impl WordFormatter for Augmenter {
    fn format(&self, words: &mut [String], rng: &mut dyn RngCore) {
        for formatter in &self.formatters {
            formatter.format(words, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{}", "x".repeat(i % 4 + 1))).collect()
    }

    fn suffix_count(before: &[String], after: &[String]) -> usize {
        before
            .iter()
            .zip(after)
            .map(|(b, a)| a.chars().count() - b.chars().count())
            .sum()
    }

    #[test]
    fn punctuation_touches_at_most_a_fifth() {
        let original = words(20);
        let mut formatted = original.clone();
        PunctuationFormatter.format(&mut formatted, &mut StdRng::seed_from_u64(11));

        let added = suffix_count(&original, &formatted);
        assert!(added >= 1 && added <= 4);
        for (b, a) in original.iter().zip(&formatted) {
            assert!(a.starts_with(b.as_str()));
            if a != b {
                let last = a.chars().last().unwrap();
                assert!(PUNCTUATION_MARKS.contains(&last));
                assert_eq!(a.len(), b.len() + 1);
            }
        }
    }

    #[test]
    fn numbers_append_single_digits() {
        let original = words(25);
        let mut formatted = original.clone();
        NumberFormatter.format(&mut formatted, &mut StdRng::seed_from_u64(5));

        let added = suffix_count(&original, &formatted);
        assert!(added >= 1 && added <= 5);
        for (b, a) in original.iter().zip(&formatted) {
            if a != b {
                assert!(a.chars().last().unwrap().is_ascii_digit());
                assert_eq!(a.len(), b.len() + 1);
            }
        }
    }

    #[test]
    fn fewer_than_five_words_get_no_draws() {
        let original = words(4);
        let mut formatted = original.clone();
        Augmenter::from_flags(true, true).format(&mut formatted, &mut StdRng::seed_from_u64(9));
        assert_eq!(original, formatted);
    }

    #[test]
    fn augmenter_from_flags() {
        let original = words(30);

        let mut plain = original.clone();
        Augmenter::from_flags(false, false).format(&mut plain, &mut StdRng::seed_from_u64(3));
        assert_eq!(plain, original);

        let mut digits = original.clone();
        Augmenter::from_flags(true, false).format(&mut digits, &mut StdRng::seed_from_u64(3));
        assert_ne!(digits, original);
        assert!(digits
            .iter()
            .all(|w| !w.ends_with(|c: char| PUNCTUATION_MARKS.contains(&c))));

        let mut marks = original.clone();
        Augmenter::from_flags(false, true).format(&mut marks, &mut StdRng::seed_from_u64(3));
        assert_ne!(marks, original);
        assert!(marks.iter().all(|w| !w.ends_with(|c: char| c.is_ascii_digit())));
    }

    #[test]
    fn same_seed_same_output() {
        let mut a = words(30);
        let mut b = words(30);
        let augmenter = Augmenter::from_flags(true, true);
        augmenter.format(&mut a, &mut StdRng::seed_from_u64(42));
        augmenter.format(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
