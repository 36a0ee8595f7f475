use std::fmt;

/// Errors surfaced by the typing test core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedTypeError {
    /// The corpus holds fewer distinct words than a sentence needs.
    InsufficientCorpus { requested: usize, available: usize },
    /// No embedded corpus goes by this name.
    UnknownLanguage(String),
    /// An embedded corpus exists but could not be decoded.
    MalformedCorpus { name: String, reason: String },
}

impl fmt::Display for SpeedTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientCorpus {
                requested,
                available,
            } => write!(
                f,
                "corpus has {available} distinct words but {requested} were requested"
            ),
            Self::UnknownLanguage(name) => write!(f, "no word list named '{name}'"),
            Self::MalformedCorpus { name, reason } => {
                write!(f, "word list '{name}' is malformed: {reason}")
            }
        }
    }
}

impl std::error::Error for SpeedTypeError {}

pub type Result<T> = std::result::Result<T, SpeedTypeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_corpus_message_names_both_counts() {
        let err = SpeedTypeError::InsufficientCorpus {
            requested: 10,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "corpus has 5 distinct words but 10 were requested"
        );
    }

    #[test]
    fn unknown_language_message() {
        let err = SpeedTypeError::UnknownLanguage("klingon".into());
        assert_eq!(err.to_string(), "no word list named 'klingon'");
    }
}
