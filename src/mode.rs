//! Termination and sizing policies for a typing test.
//!
//! A [`ModeSetting`] is the serializable choice the user makes; [`Mode`] is
//! the behaviour the session dispatches through once a run is set up.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::word_generator::Sentence;

pub const WORDS_PRESETS: [usize; 4] = [10, 25, 50, 100];
pub const TIME_PRESETS_SECS: [u64; 4] = [15, 30, 60, 120];

pub const DEFAULT_WORD_COUNT: usize = 25;
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Upper bound on typing speed used to size time-mode sentences.
const TIME_MODE_WPM_BOUND: u64 = 300;

#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum ModeKind {
    #[default]
    Words,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModeSetting {
    Words { word_count: usize },
    Time { time_limit_secs: u64 },
}

impl Default for ModeSetting {
    fn default() -> Self {
        Self::default_for(ModeKind::Words)
    }
}

impl ModeSetting {
    pub fn default_for(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Words => Self::Words {
                word_count: WordsMode::DEFAULT_SIZE,
            },
            ModeKind::Time => Self::Time {
                time_limit_secs: TimeMode::DEFAULT_SIZE,
            },
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Words { .. } => ModeKind::Words,
            Self::Time { .. } => ModeKind::Time,
        }
    }

    pub fn build(&self) -> Box<dyn Mode> {
        match *self {
            Self::Words { word_count } => Box::new(WordsMode::new(word_count)),
            Self::Time { time_limit_secs } => Box::new(TimeMode::new(time_limit_secs)),
        }
    }

    /// Step to the next (or previous) preset, wrapping around. A size that
    /// is not a preset jumps to the first preset above it.
    pub fn cycled(&self, forward: bool) -> Self {
        match *self {
            Self::Words { word_count } => Self::Words {
                word_count: cycle(&WORDS_PRESETS, word_count, forward),
            },
            Self::Time { time_limit_secs } => Self::Time {
                time_limit_secs: cycle(&TIME_PRESETS_SECS, time_limit_secs, forward),
            },
        }
    }
}

impl fmt::Display for ModeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Words { word_count } => write!(f, "words {word_count}"),
            Self::Time { time_limit_secs } => write!(f, "time {time_limit_secs}s"),
        }
    }
}

fn cycle<T: Copy + PartialOrd>(presets: &[T], current: T, forward: bool) -> T {
    let len = presets.len();
    let idx = match presets.iter().position(|p| *p == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => presets.iter().position(|p| *p > current).unwrap_or(0),
    };
    presets[idx]
}

/// The slice of session state a mode needs to make its decisions.
#[derive(Debug, Clone, Copy)]
pub struct ModeContext<'a> {
    pub sentence: &'a Sentence,
    pub input: &'a str,
    pub started_at: Option<Duration>,
    pub now: Duration,
}

impl<'a> ModeContext<'a> {
    /// Space-delimited tokens of the input; a trailing space yields a
    /// trailing empty token.
    pub fn input_words(&self) -> Vec<&'a str> {
        self.input.split(' ').collect()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|start| self.now.saturating_sub(start))
            .unwrap_or_default()
    }
}

/// Which part of the target sentence a finished run is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringSpan {
    /// Leading target words compared character by character.
    pub words: usize,
    /// Inter-word spaces credited as correct without comparison.
    pub credited_spaces: usize,
}

pub trait Mode: fmt::Debug {
    fn kind(&self) -> ModeKind;

    /// Word count or time limit a freshly selected mode starts with.
    fn default_size(&self) -> usize;

    /// How many words the target sentence needs.
    fn word_count(&self) -> usize;

    fn is_end_condition(&self, ctx: &ModeContext<'_>) -> bool;

    /// Seconds the speed calculation divides by.
    fn scoring_denominator(&self, ctx: &ModeContext<'_>) -> f64;

    fn scoring_span(&self, ctx: &ModeContext<'_>) -> ScoringSpan;

    /// Seconds shown on the countdown when the run starts, if any.
    fn countdown_secs(&self) -> Option<u64> {
        None
    }

    /// Whether the display scrolls through a bounded window of lines.
    fn uses_viewport(&self) -> bool {
        false
    }
}

/// Ends once every target word has been typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordsMode {
    word_count: usize,
}

impl WordsMode {
    pub const DEFAULT_SIZE: usize = DEFAULT_WORD_COUNT;

    pub fn new(word_count: usize) -> Self {
        Self { word_count }
    }
}

impl Mode for WordsMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Words
    }

    fn default_size(&self) -> usize {
        Self::DEFAULT_SIZE
    }

    fn word_count(&self) -> usize {
        self.word_count
    }

    fn is_end_condition(&self, ctx: &ModeContext<'_>) -> bool {
        let Some(last_target) = ctx.sentence.words().last() else {
            return false;
        };

        let typed = ctx.input_words();
        let expected = ctx.sentence.word_count();
        let last_typed_len = typed.last().map_or(0, |w| w.chars().count());

        // Exact-length last word, or the user moved past it with a space.
        (typed.len() == expected && last_typed_len == last_target.chars().count())
            || (typed.len() > expected && ctx.input.ends_with(' '))
    }

    fn scoring_denominator(&self, ctx: &ModeContext<'_>) -> f64 {
        ctx.elapsed().as_secs_f64()
    }

    fn scoring_span(&self, ctx: &ModeContext<'_>) -> ScoringSpan {
        let words = ctx.sentence.word_count();
        ScoringSpan {
            words,
            credited_spaces: words.saturating_sub(1),
        }
    }
}

/// Ends when the wall clock passes the time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeMode {
    time_limit: Duration,
}

impl TimeMode {
    pub const DEFAULT_SIZE: u64 = DEFAULT_TIME_LIMIT_SECS;

    pub fn new(time_limit_secs: u64) -> Self {
        Self {
            time_limit: Duration::from_secs(time_limit_secs),
        }
    }

    /// Enough words that nobody typing under the speed bound runs out.
    pub fn word_count_for(time_limit_secs: u64) -> usize {
        (TIME_MODE_WPM_BOUND.saturating_mul(time_limit_secs) as f64 / 60.0).round() as usize
    }
}

impl Mode for TimeMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Time
    }

    fn default_size(&self) -> usize {
        Self::DEFAULT_SIZE as usize
    }

    fn word_count(&self) -> usize {
        Self::word_count_for(self.time_limit.as_secs())
    }

    /// Only the deadline counts, even for an empty sentence. A deadline past
    /// the end of the clock is never reached.
    fn is_end_condition(&self, ctx: &ModeContext<'_>) -> bool {
        ctx.started_at
            .and_then(|start| start.checked_add(self.time_limit))
            .is_some_and(|deadline| ctx.now >= deadline)
    }

    /// The run is clipped at the limit, so the limit itself is the duration.
    fn scoring_denominator(&self, _ctx: &ModeContext<'_>) -> f64 {
        self.time_limit.as_secs_f64()
    }

    fn scoring_span(&self, ctx: &ModeContext<'_>) -> ScoringSpan {
        let typed = ctx.input_words();
        let trailing_space = typed.last().is_some_and(|w| w.is_empty());
        let available = ctx.sentence.word_count();

        let words = (typed.len() - usize::from(trailing_space)).min(available);
        let credited_spaces = (typed.len() - 1).min(available.saturating_sub(1).max(words));

        ScoringSpan {
            words,
            credited_spaces,
        }
    }

    fn countdown_secs(&self) -> Option<u64> {
        Some(self.time_limit.as_secs())
    }

    fn uses_viewport(&self) -> bool {
        true
    }
}
