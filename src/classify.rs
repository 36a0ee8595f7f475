/// How a single displayed character relates to what was typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Typed and matches the target.
    Correct,
    /// Typed but differs from the target.
    Wrong,
    /// Typed beyond the end of the target word.
    Extra,
    /// Target character not typed yet.
    Pending,
}

/// One cell of a classified word. `target` is `None` only for extra
/// input, `typed` is `None` only for pending target characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifiedChar {
    pub target: Option<char>,
    pub typed: Option<char>,
    pub class: Classification,
}

impl ClassifiedChar {
    pub fn typed(target: char, typed: char) -> Self {
        let class = if target == typed {
            Classification::Correct
        } else {
            Classification::Wrong
        };
        Self {
            target: Some(target),
            typed: Some(typed),
            class,
        }
    }

    pub fn extra(typed: char) -> Self {
        Self {
            target: None,
            typed: Some(typed),
            class: Classification::Extra,
        }
    }

    pub fn pending(target: char) -> Self {
        Self {
            target: Some(target),
            typed: None,
            class: Classification::Pending,
        }
    }

    /// The character to draw: what was typed where there is input, so a
    /// mistake stays visible, and the target otherwise.
    pub fn shown(&self) -> char {
        self.typed.or(self.target).unwrap_or(' ')
    }
}

/// Label every character of `target` against `typed` at the same word
/// position.
///
/// The result is as long as the longer of the two words: shared positions
/// are correct or wrong, typed overflow is extra and the untyped rest of
/// the target is pending.
pub fn classify(target: &str, typed: &str) -> Vec<ClassifiedChar> {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let shared = target.len().min(typed.len());

    let mut out = Vec::with_capacity(target.len().max(typed.len()));
    out.extend(
        target
            .iter()
            .zip(&typed)
            .map(|(&t, &c)| ClassifiedChar::typed(t, c)),
    );
    out.extend(typed[shared..].iter().map(|&c| ClassifiedChar::extra(c)));
    out.extend(target[shared..].iter().map(|&c| ClassifiedChar::pending(c)));
    out
}

/// Number of positions where `typed` matches `target`.
pub fn matching_chars(target: &str, typed: &str) -> usize {
    target
        .chars()
        .zip(typed.chars())
        .filter(|(a, b)| a == b)
        .count()
}

/// Characters accepted into the input buffer. Everything else is dropped.
pub fn is_accepted(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '|' | ',' | '.' | '_' | '!' | ':' | ';')
}
