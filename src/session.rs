use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::is_accepted;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::layout::{layout, LayoutParams, TextLayout, Viewport};
use crate::mode::{Mode, ModeContext, ModeKind, ModeSetting};
use crate::stats::Metrics;
use crate::word_generator::{Sentence, SentenceGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: ModeSetting,
    pub include_numbers: bool,
    pub include_punctuation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestState {
    Idle,
    Active,
    Ended,
}

/// One key press as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStroke {
    Char(char),
    Backspace,
}

/// A single typing test: target sentence, typed input and the
/// Idle -> Active -> Ended lifecycle.
#[derive(Debug)]
pub struct TypingSession<C: Clock = SystemClock> {
    config: SessionConfig,
    mode: Box<dyn Mode>,
    generator: SentenceGenerator,
    clock: C,
    sentence: Sentence,
    input: String,
    state: TestState,
    armed: bool,
    started_at: Option<Duration>,
    ended_at: Option<Duration>,
    seconds_remaining: Option<u64>,
    metrics: Option<Metrics>,
    viewport: Viewport,
    /// Geometry of the last `view`, so keystrokes can scroll the viewport.
    params: Option<LayoutParams>,
}

impl<C: Clock> TypingSession<C> {
    /// Build a session and generate its first sentence.
    ///
    /// A generator holding a fixed prompt forces words mode sized to the
    /// prompt.
    pub fn new(config: SessionConfig, generator: SentenceGenerator, clock: C) -> Result<Self> {
        let mut config = config;
        if let Some(prompt) = generator.fixed_prompt() {
            config.mode = ModeSetting::Words {
                word_count: prompt.word_count(),
            };
        }

        let mut session = Self {
            mode: config.mode.build(),
            config,
            generator,
            clock,
            sentence: Sentence::default(),
            input: String::new(),
            state: TestState::Idle,
            armed: false,
            started_at: None,
            ended_at: None,
            seconds_remaining: None,
            metrics: None,
            viewport: Viewport::default(),
            params: None,
        };
        session.reset(true)?;
        Ok(session)
    }

    /// Back to Idle with an empty input. `regenerate` draws a new sentence;
    /// otherwise the same sentence is offered again.
    pub fn reset(&mut self, regenerate: bool) -> Result<()> {
        if regenerate {
            self.sentence = self.generator.generate(
                self.mode.word_count(),
                self.config.include_numbers,
                self.config.include_punctuation,
            )?;
        }

        self.input.clear();
        self.state = TestState::Idle;
        self.started_at = None;
        self.ended_at = None;
        self.metrics = None;
        self.seconds_remaining = self.mode.countdown_secs();
        self.viewport.reset();

        debug!(
            mode = %self.config.mode,
            regenerate,
            words = self.sentence.word_count(),
            "session reset"
        );
        Ok(())
    }

    /// The user clicked into the play area. The run itself starts on the
    /// next key press.
    pub fn arm(&mut self) {
        if !self.armed {
            debug!("session armed");
        }
        self.armed = true;
    }

    /// Feed one key press. Returns whether the input changed.
    pub fn on_key_down(&mut self, key: KeyStroke) -> bool {
        if self.state == TestState::Ended {
            return false;
        }
        // a key landing after the deadline must not count
        if self.state == TestState::Active && self.poll() {
            return false;
        }

        if self.armed && self.state == TestState::Idle {
            self.started_at = Some(self.clock.now());
            self.state = TestState::Active;
            debug!(mode = %self.config.mode, "test started");
        }

        let changed = match key {
            KeyStroke::Backspace => self.input.pop().is_some(),
            KeyStroke::Char(c) if self.state == TestState::Active && is_accepted(c) => {
                self.input.push(c);
                true
            }
            KeyStroke::Char(_) => false,
        };

        if changed {
            self.follow_cursor();
        }
        if changed && self.state == TestState::Active {
            let now = self.clock.now();
            if self.mode.is_end_condition(&self.context(now)) {
                self.finish(now);
            }
        }

        changed
    }

    /// Keep the viewport on the cursor between renders, one keystroke (and
    /// so at most one line) at a time.
    fn follow_cursor(&mut self) {
        if !self.mode.uses_viewport() {
            return;
        }
        if let Some(params) = self.params {
            let full = layout(&self.sentence, &self.input, params);
            self.viewport.follow(full.cursor.line);
        }
    }

    /// Per-tick end condition check. Returns true only on the tick that
    /// ends the test.
    pub fn poll(&mut self) -> bool {
        if self.state != TestState::Active {
            return false;
        }
        let now = self.clock.now();
        if self.mode.is_end_condition(&self.context(now)) {
            self.finish(now);
            return true;
        }
        false
    }

    /// Once-a-second countdown for display. Never ends the test.
    pub fn on_timer_second(&mut self) {
        if self.state == TestState::Active {
            if let Some(secs) = self.seconds_remaining.as_mut() {
                *secs = secs.saturating_sub(1);
            }
        }
    }

    fn finish(&mut self, now: Duration) {
        let ctx = self.context(now);
        let span = self.mode.scoring_span(&ctx);
        let total_time = self.mode.scoring_denominator(&ctx);
        let metrics = Metrics::compute(&self.sentence, &self.input, span, total_time);

        self.state = TestState::Ended;
        self.ended_at = Some(now);
        self.metrics = Some(metrics);

        info!(
            mode = %self.config.mode,
            total_time = metrics.total_time_secs,
            wpm = metrics.speed_wpm,
            accuracy = %metrics.accuracy,
            "test ended"
        );
    }

    fn context(&self, now: Duration) -> ModeContext<'_> {
        ModeContext {
            sentence: &self.sentence,
            input: &self.input,
            started_at: self.started_at,
            now,
        }
    }

    /// Replace the whole configuration and start over with a new sentence.
    /// A fixed prompt is dropped. On error the session is left as it was.
    pub fn configure(&mut self, config: SessionConfig) -> Result<()> {
        let mode = config.mode.build();
        let prompt = self.generator.release_prompt();

        let sentence = match self.generator.generate(
            mode.word_count(),
            config.include_numbers,
            config.include_punctuation,
        ) {
            Ok(sentence) => sentence,
            Err(err) => {
                if let Some(prompt) = prompt {
                    self.generator.set_prompt(prompt);
                }
                return Err(err);
            }
        };

        self.config = config;
        self.mode = mode;
        self.sentence = sentence;
        self.reset(false)
    }

    /// Switch kind; the size goes back to that kind's default.
    pub fn set_mode(&mut self, kind: ModeKind) -> Result<()> {
        debug!(%kind, "mode switched");
        self.configure(SessionConfig {
            mode: ModeSetting::default_for(kind),
            ..self.config
        })
    }

    pub fn set_mode_setting(&mut self, mode: ModeSetting) -> Result<()> {
        self.configure(SessionConfig {
            mode,
            ..self.config
        })
    }

    pub fn cycle_size(&mut self, forward: bool) -> Result<()> {
        self.set_mode_setting(self.config.mode.cycled(forward))
    }

    pub fn set_include_numbers(&mut self, include_numbers: bool) -> Result<()> {
        self.configure(SessionConfig {
            include_numbers,
            ..self.config
        })
    }

    pub fn set_include_punctuation(&mut self, include_punctuation: bool) -> Result<()> {
        self.configure(SessionConfig {
            include_punctuation,
            ..self.config
        })
    }

    /// Wrapped, classified lines for the current input. Time mode only
    /// returns the rows inside its scrolling viewport.
    pub fn view(&mut self, params: LayoutParams) -> TextLayout {
        self.params = Some(params);
        let full = layout(&self.sentence, &self.input, params);
        if self.mode.uses_viewport() {
            self.viewport.apply(&full, params.line_height)
        } else {
            full
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> &dyn Mode {
        self.mode.as_ref()
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> TestState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.state == TestState::Ended
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    pub fn seconds_remaining(&self) -> Option<u64> {
        self.seconds_remaining
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Time since the first key press, frozen once the test ends.
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            (Some(start), None) => self.clock.now().saturating_sub(start),
            _ => Duration::ZERO,
        }
    }
}
