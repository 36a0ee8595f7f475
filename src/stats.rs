use std::fmt;

use crate::classify::matching_chars;
use crate::mode::ScoringSpan;
use crate::word_generator::Sentence;

/// Average word length used to turn characters into words.
const CHARS_PER_WORD: f64 = 5.0;

/// Below this share of the scored target typed, accuracy is not reported.
const MIN_TYPED_SHARE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accuracy {
    Percent(f64),
    /// Too little was typed, or no time elapsed.
    NotAvailable,
}

impl Accuracy {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::Percent(p) => Some(*p),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{p:.2} %"),
            Self::NotAvailable => f.write_str("NA"),
        }
    }
}

/// End-of-test results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub total_time_secs: f64,
    pub accuracy: Accuracy,
    /// Words per minute, rounded up.
    pub speed_wpm: f64,
    pub correct_chars: usize,
    pub typed_chars: usize,
    /// Length of the target text the run was scored against.
    pub scored_chars: usize,
}

impl Metrics {
    pub fn compute(
        sentence: &Sentence,
        input: &str,
        span: ScoringSpan,
        total_time_secs: f64,
    ) -> Self {
        let typed_words: Vec<&str> = input.split(' ').collect();
        let target_words = &sentence.words()[..span.words.min(sentence.word_count())];

        let matched: usize = target_words
            .iter()
            .zip(&typed_words)
            .map(|(target, typed)| matching_chars(target, typed))
            .sum();
        let correct_chars = matched + span.credited_spaces;

        let scored_chars = target_words
            .iter()
            .map(|w| w.chars().count())
            .sum::<usize>()
            + span.credited_spaces;
        let typed_chars = input.chars().count();

        let timed = total_time_secs > 0.0;

        let accuracy = if !timed
            || scored_chars == 0
            || (typed_chars as f64) < MIN_TYPED_SHARE * scored_chars as f64
        {
            Accuracy::NotAvailable
        } else {
            Accuracy::Percent(correct_chars as f64 / scored_chars as f64 * 100.0)
        };

        let speed_wpm = if timed {
            (typed_chars as f64 * 60.0 / (CHARS_PER_WORD * total_time_secs)).ceil()
        } else {
            0.0
        };

        Self {
            total_time_secs: total_time_secs.max(0.0),
            accuracy,
            speed_wpm,
            correct_chars,
            typed_chars,
            scored_chars,
        }
    }

    pub fn summary_lines(&self) -> [String; 3] {
        let accuracy = match self.accuracy {
            Accuracy::Percent(p) => format!("Accuracy: {p:.2} %"),
            Accuracy::NotAvailable => "Accuracy: NA".to_string(),
        };
        [
            format!("Total time: {:.2} secs", self.total_time_secs),
            accuracy,
            format!("Typing speed: {} wpm", self.speed_wpm),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_span(sentence: &Sentence) -> ScoringSpan {
        ScoringSpan {
            words: sentence.word_count(),
            credited_spaces: sentence.word_count().saturating_sub(1),
        }
    }

    #[test]
    fn test_exact_match_is_full_accuracy() {
        let sentence = Sentence::from_text("the quick fox");
        let metrics = Metrics::compute(&sentence, "the quick fox", full_span(&sentence), 6.0);

        assert_eq!(metrics.correct_chars, 13);
        assert_eq!(metrics.scored_chars, 13);
        assert_eq!(metrics.accuracy, Accuracy::Percent(100.0));
        // 13 chars * 60 / (5 * 6) = 26
        assert_eq!(metrics.speed_wpm, 26.0);
    }

    #[test]
    fn test_one_wrong_char() {
        let sentence = Sentence::from_text("cat dog");
        let metrics = Metrics::compute(&sentence, "cat dig", full_span(&sentence), 3.0);

        assert_eq!(metrics.correct_chars, 6);
        let pct = metrics.accuracy.percent().unwrap();
        assert!((pct - 600.0 / 7.0).abs() < 1e-9);
        assert_eq!(metrics.accuracy.to_string(), "85.71 %");
    }

    #[test]
    fn test_speed_rounds_up() {
        let sentence = Sentence::from_text("cat dog");
        let metrics = Metrics::compute(&sentence, "cat dog", full_span(&sentence), 7.0);
        // 7 * 60 / 35 = 12 exactly
        assert_eq!(metrics.speed_wpm, 12.0);

        let metrics = Metrics::compute(&sentence, "cat dog", full_span(&sentence), 8.0);
        // 420 / 40 = 10.5
        assert_eq!(metrics.speed_wpm, 11.0);
    }

    #[test]
    fn test_too_little_typed_is_na() {
        let sentence = Sentence::from_text("extraordinary circumstances");
        let metrics = Metrics::compute(&sentence, "extra", full_span(&sentence), 4.0);

        assert_eq!(metrics.accuracy, Accuracy::NotAvailable);
        assert_eq!(metrics.accuracy.to_string(), "NA");
        assert!(metrics.speed_wpm > 0.0);
    }

    #[test]
    fn test_zero_time_fails_soft() {
        let sentence = Sentence::from_text("cat dog");
        let metrics = Metrics::compute(&sentence, "cat dog", full_span(&sentence), 0.0);

        assert_eq!(metrics.speed_wpm, 0.0);
        assert_eq!(metrics.accuracy, Accuracy::NotAvailable);
        assert_eq!(metrics.total_time_secs, 0.0);
    }

    #[test]
    fn test_empty_sentence_is_na() {
        let sentence = Sentence::default();
        let metrics = Metrics::compute(&sentence, "", full_span(&sentence), 5.0);

        assert_eq!(metrics.accuracy, Accuracy::NotAvailable);
        assert_eq!(metrics.speed_wpm, 0.0);
    }

    #[test]
    fn test_partial_span() {
        let sentence = Sentence::from_text("cat dog bird fish");
        let span = ScoringSpan {
            words: 2,
            credited_spaces: 2,
        };
        let metrics = Metrics::compute(&sentence, "cat dog ", span, 15.0);

        assert_eq!(metrics.scored_chars, 8);
        assert_eq!(metrics.accuracy, Accuracy::Percent(100.0));
    }

    #[test]
    fn test_summary_lines() {
        let metrics = Metrics {
            total_time_secs: 12.346,
            accuracy: Accuracy::Percent(91.5),
            speed_wpm: 48.0,
            correct_chars: 0,
            typed_chars: 0,
            scored_chars: 0,
        };
        assert_eq!(
            metrics.summary_lines(),
            [
                "Total time: 12.35 secs".to_string(),
                "Accuracy: 91.50 %".to_string(),
                "Typing speed: 48 wpm".to_string(),
            ]
        );
    }
}
