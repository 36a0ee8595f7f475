mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};
use tracing::{info, warn};

use speedtype::{
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    language::SupportedLanguage,
    logging,
    mode::ModeKind,
    runtime::{key_stroke, CrosstermEventSource, FixedTicker, Runner, SecondCounter, SessionEvent},
    session::{TestState, TypingSession},
    word_generator::SentenceGenerator,
    SpeedTypeError,
};

/// typing speed test with word-count and time-limit modes
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A typing speed test for the terminal. Type a randomly generated sentence, either a fixed number of words or against the clock, and get your speed and accuracy."
)]
pub struct Cli {
    /// number of words to use in test
    #[clap(short = 'w', long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    words: Option<usize>,

    /// number of seconds to run test (selects time mode)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    secs: Option<u64>,

    /// add digits to some words
    #[clap(short = 'n', long)]
    numbers: bool,

    /// add punctuation marks to some words
    #[clap(short = 'p', long)]
    punctuation: bool,

    /// language to pull words from
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// seed for reproducible sentences
    #[clap(long)]
    seed: Option<u64>,

    /// custom prompt to use
    #[clap(long)]
    prompt: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given on top of the stored config.
    fn apply_to(&self, config: &mut Config) {
        if let Some(words) = self.words {
            config.mode = ModeKind::Words;
            config.word_count = words;
        }
        if let Some(secs) = self.secs {
            config.mode = ModeKind::Time;
            config.time_limit_secs = secs;
        }
        if self.numbers {
            config.include_numbers = true;
        }
        if self.punctuation {
            config.include_punctuation = true;
        }
        if let Some(language) = self.language {
            config.language = language;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: TypingSession,
    pub config: Config,
    /// Last setting change that could not be applied.
    pub notice: Option<String>,
    /// Where the sentence was last drawn; a click inside it arms the run.
    pub typing_area: Rect,
    seconds: SecondCounter,
}

impl App {
    pub fn new(cli: &Cli, config: Config) -> Result<Self, SpeedTypeError> {
        let corpus = Box::new(config.language.as_lang()?);
        let mut generator = match cli.seed {
            Some(seed) => SentenceGenerator::with_seed(corpus, seed),
            None => SentenceGenerator::new(corpus),
        };
        if let Some(prompt) = &cli.prompt {
            generator = generator.with_prompt(prompt);
        }

        let session = TypingSession::new(config.to_session_config(), generator, SystemClock::new())?;

        Ok(Self {
            session,
            config,
            notice: None,
            typing_area: Rect::default(),
            seconds: SecondCounter::default(),
        })
    }

    fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            // ctrl+c to quit
            if key.code == KeyCode::Char('c') {
                return Control::Quit;
            }
            return Control::Continue;
        }

        let result = match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Enter => {
                self.session.arm();
                Ok(())
            }
            KeyCode::Tab | KeyCode::Right => self.session.reset(true),
            KeyCode::Left => self.session.reset(false),
            KeyCode::F(1) => self.session.set_mode(ModeKind::Words),
            KeyCode::F(2) => self.session.set_mode(ModeKind::Time),
            KeyCode::F(3) => {
                let on = !self.session.config().include_numbers;
                self.session.set_include_numbers(on)
            }
            KeyCode::F(4) => {
                let on = !self.session.config().include_punctuation;
                self.session.set_include_punctuation(on)
            }
            KeyCode::Up => self.session.cycle_size(true),
            KeyCode::Down => self.session.cycle_size(false),
            _ => {
                if let Some(stroke) = key_stroke(&key) {
                    self.session.on_key_down(stroke);
                }
                return Control::Continue;
            }
        };

        match result {
            Ok(()) => self.notice = None,
            Err(err) => {
                warn!(%err, "setting change rejected");
                self.notice = Some(err.to_string());
            }
        }
        Control::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if self
                .typing_area
                .contains(Position::new(mouse.column, mouse.row))
            {
                self.session.arm();
            }
        }
    }

    fn on_tick(&mut self) {
        if self.session.state() != TestState::Active {
            self.seconds.reset();
            return;
        }
        if self.seconds.on_tick() {
            self.session.on_timer_second();
        }
        self.session.poll();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = logging::init_from_env()? {
        info!(path = %path.display(), "logging enabled");
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    info!(path = %store.path().display(), mode = %config.mode, "config loaded");
    cli.apply_to(&mut config);

    let mut app = App::new(&cli, config)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;

    // a prompt run sizes the session to the prompt; keep that out of the config
    if cli.prompt.is_none() {
        app.config.update_from_session(app.session.config());
    }
    store.save(&app.config)?;

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            SessionEvent::Tick => {
                let was_active = app.session.state() == TestState::Active;
                app.on_tick();
                // redraw for the countdown and for the tick that ends the test
                if was_active {
                    terminal.draw(|f| ui::draw(app, f))?;
                }
                continue;
            }
            SessionEvent::Resize => {}
            SessionEvent::Mouse(mouse) => app.handle_mouse(mouse),
            SessionEvent::Key(key) => {
                if app.handle_key(key) == Control::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use speedtype::mode::ModeSetting;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn prompt_app(prompt: &str) -> App {
        let cli = Cli {
            prompt: Some(prompt.to_string()),
            seed: Some(1),
            ..Default::default()
        };
        App::new(&cli, Config::default()).unwrap()
    }

    fn seeded_app(config: Config) -> App {
        let cli = Cli {
            seed: Some(7),
            ..Default::default()
        };
        App::new(&cli, config).unwrap()
    }

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["speedtype"]);

        assert_eq!(cli.words, None);
        assert_eq!(cli.secs, None);
        assert!(!cli.numbers);
        assert!(!cli.punctuation);
        assert_eq!(cli.language, None);
        assert_eq!(cli.prompt, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "speedtype",
            "-s",
            "60",
            "-n",
            "-p",
            "-l",
            "english_short",
            "--seed",
            "3",
        ]);

        assert_eq!(cli.secs, Some(60));
        assert!(cli.numbers);
        assert!(cli.punctuation);
        assert_eq!(cli.language, Some(SupportedLanguage::EnglishShort));
        assert_eq!(cli.seed, Some(3));
    }

    #[test]
    fn test_cli_rejects_zero_sizes() {
        assert!(Cli::try_parse_from(["speedtype", "-w", "0"]).is_err());
        assert!(Cli::try_parse_from(["speedtype", "--secs", "0"]).is_err());
        assert!(Cli::try_parse_from(["speedtype", "-s", "-5"]).is_err());

        let cli = Cli::try_parse_from(["speedtype", "-w", "1", "-s", "1"]).unwrap();
        assert_eq!(cli.words, Some(1));
        assert_eq!(cli.secs, Some(1));
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config {
            include_numbers: true,
            ..Default::default()
        };
        Cli::parse_from(["speedtype", "-w", "50"]).apply_to(&mut config);
        assert_eq!(config.mode, ModeKind::Words);
        assert_eq!(config.word_count, 50);
        // flags not given leave the stored value alone
        assert!(config.include_numbers);

        Cli::parse_from(["speedtype", "--secs", "15"]).apply_to(&mut config);
        assert_eq!(config.mode, ModeKind::Time);
        assert_eq!(config.time_limit_secs, 15);
        assert_eq!(config.word_count, 50);
    }

    #[test]
    fn test_app_new_with_prompt() {
        let app = prompt_app("hello there");
        assert_eq!(app.session.sentence().as_str(), "hello there");
        assert_eq!(
            app.session.config().mode,
            ModeSetting::Words { word_count: 2 }
        );
    }

    #[test]
    fn test_typing_requires_arming() {
        let mut app = prompt_app("hi");

        app.handle_key(press(KeyCode::Char('h')));
        assert_eq!(app.session.input(), "");

        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('h')));
        app.handle_key(press(KeyCode::Char('i')));
        assert_eq!(app.session.state(), TestState::Ended);
    }

    #[test]
    fn test_click_inside_typing_area_arms() {
        let mut app = prompt_app("hi");
        render(&mut app);

        let outside = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(outside);
        assert!(!app.session.is_armed());

        let inside = MouseEvent {
            column: app.typing_area.x,
            row: app.typing_area.y,
            ..outside
        };
        app.handle_mouse(inside);
        assert!(app.session.is_armed());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = prompt_app("hi");
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Control::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Control::Quit
        );
        assert_eq!(app.handle_key(press(KeyCode::Tab)), Control::Continue);
    }

    #[test]
    fn test_repeat_and_new_sentence() {
        let mut app = seeded_app(Config::default());
        let first = app.session.sentence().clone();

        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.session.sentence(), &first);

        app.handle_key(press(KeyCode::Tab));
        assert_ne!(app.session.sentence(), &first);
    }

    #[test]
    fn test_function_keys_change_settings() {
        let mut app = seeded_app(Config::default());

        app.handle_key(press(KeyCode::F(2)));
        assert_eq!(app.session.config().mode.kind(), ModeKind::Time);

        app.handle_key(press(KeyCode::Up));
        assert_eq!(
            app.session.config().mode,
            ModeSetting::Time {
                time_limit_secs: 60
            }
        );

        app.handle_key(press(KeyCode::F(3)));
        app.handle_key(press(KeyCode::F(4)));
        assert!(app.session.config().include_numbers);
        assert!(app.session.config().include_punctuation);

        app.handle_key(press(KeyCode::F(1)));
        assert_eq!(
            app.session.config().mode,
            ModeSetting::Words { word_count: 25 }
        );
    }

    #[test]
    fn test_rejected_setting_sets_notice() {
        let mut app = seeded_app(Config {
            language: SupportedLanguage::EnglishShort,
            mode: ModeKind::Time,
            time_limit_secs: 30,
            ..Default::default()
        });
        let before = app.session.sentence().clone();

        // 60 s needs 300 words, more than the short list holds
        app.handle_key(press(KeyCode::Up));
        assert!(app.notice.is_some());
        assert_eq!(app.session.sentence(), &before);

        app.handle_key(press(KeyCode::F(1)));
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_ui_typing_state() {
        let mut app = prompt_app("hello there");
        let content = render(&mut app);

        assert!(content.contains("hello there"));
        assert!(content.contains("press enter"));
        assert!(content.contains("words 2"));
    }

    #[test]
    fn test_ui_draws_typed_chars_over_target() {
        let mut app = prompt_app("cat dog bird");
        app.handle_key(press(KeyCode::Enter));
        for c in "cat dig".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }

        let content = render(&mut app);
        assert!(content.contains("cat dig bird"));
    }

    #[test]
    fn test_ui_results_state() {
        let mut app = prompt_app("hi");
        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('h')));
        app.handle_key(press(KeyCode::Char('i')));

        let content = render(&mut app);
        assert!(content.contains("Total time:"));
        assert!(content.contains("Accuracy:"));
        assert!(content.contains("Typing speed:"));
    }

    #[test]
    fn test_ui_time_mode_shows_countdown() {
        let mut app = seeded_app(Config {
            mode: ModeKind::Time,
            time_limit_secs: 15,
            ..Default::default()
        });
        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('a')));

        let content = render(&mut app);
        assert!(content.contains("15"));
        assert!(content.contains("time 15s"));
    }

    #[test]
    fn test_tick_counts_down_only_while_active() {
        let mut app = seeded_app(Config {
            mode: ModeKind::Time,
            time_limit_secs: 15,
            ..Default::default()
        });
        for _ in 0..30 {
            app.on_tick();
        }
        assert_eq!(app.session.seconds_remaining(), Some(15));

        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('a')));
        for _ in 0..20 {
            app.on_tick();
        }
        assert_eq!(app.session.seconds_remaining(), Some(13));
    }
}
