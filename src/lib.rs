// Library surface for the binary and for headless/integration tests.
// Terminal rendering stays in the binary.
pub mod app_dirs;
pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod language;
pub mod layout;
pub mod logging;
pub mod mode;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod word_generator;

pub use error::{Result, SpeedTypeError};
