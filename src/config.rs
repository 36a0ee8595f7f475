use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::language::SupportedLanguage;
use crate::mode::{ModeKind, ModeSetting, DEFAULT_TIME_LIMIT_SECS, DEFAULT_WORD_COUNT};
use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ModeKind,
    pub word_count: usize,
    pub time_limit_secs: u64,
    pub include_numbers: bool,
    pub include_punctuation: bool,
    pub language: SupportedLanguage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ModeKind::Words,
            word_count: DEFAULT_WORD_COUNT,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            include_numbers: false,
            include_punctuation: false,
            language: SupportedLanguage::English,
        }
    }
}

impl Config {
    /// Replace sizes a session cannot run with (zero words or seconds) by
    /// the defaults.
    pub fn sanitized(mut self) -> Self {
        if self.word_count == 0 {
            warn!(default = DEFAULT_WORD_COUNT, "word_count must be at least 1");
            self.word_count = DEFAULT_WORD_COUNT;
        }
        if self.time_limit_secs == 0 {
            warn!(default = DEFAULT_TIME_LIMIT_SECS, "time_limit_secs must be at least 1");
            self.time_limit_secs = DEFAULT_TIME_LIMIT_SECS;
        }
        self
    }

    pub fn to_session_config(&self) -> SessionConfig {
        let mode = match self.mode {
            ModeKind::Words => ModeSetting::Words {
                word_count: self.word_count,
            },
            ModeKind::Time => ModeSetting::Time {
                time_limit_secs: self.time_limit_secs,
            },
        };
        SessionConfig {
            mode,
            include_numbers: self.include_numbers,
            include_punctuation: self.include_punctuation,
        }
    }

    /// Fold the settings a session ended with back in. The size of the
    /// mode not in use is left alone.
    pub fn update_from_session(&mut self, session: &SessionConfig) {
        self.mode = session.mode.kind();
        match session.mode {
            ModeSetting::Words { word_count } => self.word_count = word_count,
            ModeSetting::Time { time_limit_secs } => self.time_limit_secs = time_limit_secs,
        }
        self.include_numbers = session.include_numbers;
        self.include_punctuation = session.include_punctuation;
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("speedtype_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "unreadable config, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.sanitized(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "malformed config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
