//! Greedy word wrap of a classified sentence, plus the scrolling window
//! time mode shows it through.

use crate::classify::{classify, ClassifiedChar};
use crate::word_generator::Sentence;

/// Rows visible at once in a scrolling viewport.
pub const VIEWPORT_ROWS: usize = 4;

/// Geometry in whatever unit the render sink uses (cells, pixels, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Advance of one character; the font is assumed monospace.
    pub letter_width: usize,
    /// Usable width of a row.
    pub row_width: usize,
    /// Vertical distance between rows.
    pub line_height: usize,
}

impl LayoutParams {
    pub fn new(letter_width: usize, row_width: usize) -> Self {
        Self {
            letter_width,
            row_width,
            line_height: 1,
        }
    }

    pub fn with_line_height(mut self, line_height: usize) -> Self {
        self.line_height = line_height;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRenderInfo {
    /// Position of the line in the full wrap.
    pub index: usize,
    pub y: usize,
    pub cells: Vec<ClassifiedChar>,
}

impl LineRenderInfo {
    fn new(index: usize, line_height: usize) -> Self {
        Self {
            index,
            y: index * line_height,
            cells: Vec::new(),
        }
    }

    /// The line as drawn.
    pub fn text(&self) -> String {
        self.cells.iter().map(ClassifiedChar::shown).collect()
    }

    /// Target characters on this line, typed overflow left out.
    pub fn target_text(&self) -> String {
        self.cells.iter().filter_map(|c| c.target).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    /// Index of the line the cursor sits on.
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<LineRenderInfo>,
    pub cursor: Cursor,
}

/// Wrap `sentence` into rows, classifying each word against the matching
/// word of `input`.
///
/// A word joins the current row while its display width (the longer of the
/// target and the typed word) fits in what is left of the row; a word wider
/// than a whole row still gets a row of its own. Each non-final word is
/// followed by a pending space cell.
pub fn layout(sentence: &Sentence, input: &str, params: LayoutParams) -> TextLayout {
    let LayoutParams {
        letter_width,
        row_width,
        line_height,
    } = params;

    let typed: Vec<&str> = input.split(' ').collect();
    let cursor_word = typed.len() - 1;
    let word_count = sentence.word_count();

    let mut lines = Vec::new();
    let mut current = LineRenderInfo::new(0, line_height);
    let mut advance = 0;
    let mut cursor = Cursor::default();

    for (i, target) in sentence.words().iter().enumerate() {
        let typed_word = typed.get(i).copied().unwrap_or("");
        let cells = classify(target, typed_word);
        let width = cells.len() * letter_width;

        if advance > 0 && advance + width > row_width {
            let next = current.index + 1;
            lines.push(std::mem::replace(
                &mut current,
                LineRenderInfo::new(next, line_height),
            ));
            advance = 0;
        }

        if i == cursor_word {
            cursor = Cursor {
                x: advance + typed_word.chars().count() * letter_width,
                y: current.y,
                line: current.index,
            };
        } else if i + 1 == word_count && cursor_word >= word_count {
            // typed past the last word
            cursor = Cursor {
                x: advance + width,
                y: current.y,
                line: current.index,
            };
        }

        advance += width;
        current.cells.extend(cells);

        if i + 1 < word_count {
            current.cells.push(ClassifiedChar::pending(' '));
            advance += letter_width;
        }
    }

    if !current.cells.is_empty() {
        lines.push(current);
    }

    TextLayout { lines, cursor }
}

/// A window of `rows` consecutive lines that follows the cursor.
///
/// The window keeps the cursor on its second row once typing reaches the
/// third: each time the cursor drops onto row three of the window, the
/// window start moves down by one line. Only a cursor that has left the
/// window altogether (after a reflow) makes it jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    rows: usize,
    start: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(VIEWPORT_ROWS)
    }
}

impl Viewport {
    pub fn new(rows: usize) -> Self {
        Self {
            rows: rows.max(1),
            start: 0,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn reset(&mut self) {
        self.start = 0;
    }

    pub fn follow(&mut self, cursor_line: usize) {
        if cursor_line < self.start {
            self.start = cursor_line;
        } else if cursor_line >= self.start + self.rows {
            self.start = cursor_line + 1 - self.rows.min(2);
        } else if cursor_line >= self.start + 2 {
            self.start += 1;
        }
    }

    /// Scroll to `full`'s cursor and cut it down to the visible rows, with
    /// `y` measured from the top of the window.
    pub fn apply(&mut self, full: &TextLayout, line_height: usize) -> TextLayout {
        self.follow(full.cursor.line);

        let lines = full
            .lines
            .iter()
            .skip(self.start)
            .take(self.rows)
            .map(|line| LineRenderInfo {
                index: line.index,
                y: (line.index - self.start) * line_height,
                cells: line.cells.clone(),
            })
            .collect();

        let cursor = Cursor {
            y: (full.cursor.line - self.start) * line_height,
            ..full.cursor
        };

        TextLayout { lines, cursor }
    }
}
