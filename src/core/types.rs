// src/core/types.rs
use serde::{Deserialize, Serialize};

/// The lookup key of a dictionary entry, e.g. `"ka"` or `"xka"`.
pub type Reading = String;

/// The text stored for a reading. An empty word marks the reading for deletion.
pub type Word = String;

/// One verbatim line of the loaded dictionary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine {
    /// A `reading=word` line.
    Entry { reading: Reading, word: Word },
    /// Comments, blank separators and anything else that is passed through untouched.
    Other(String),
}

impl SourceLine {
    /// The line exactly as it appeared in the file (without its terminator).
    pub fn render(&self) -> String {
        match self {
            SourceLine::Entry { reading, word } => format!("{}={}", reading, word),
            SourceLine::Other(text) => text.clone(),
        }
    }
}

/// Grid display order of the alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    Natural,
    /// Moves the five vowels `a i u e o` to the end.
    VowelsLast,
}

/// Splice rule mapping a 2-D grid coordinate onto a longer reading.
///
/// With no `character` the grid addresses 2-glyph readings directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFilterState {
    pub position: usize,
    pub character: Option<char>,
}

impl KeyFilterState {
    pub fn new(position: usize, character: Option<char>) -> Self {
        Self { position, character }
    }

    /// Number of glyphs spliced into a grid coordinate.
    pub fn depth(&self) -> usize {
        usize::from(self.character.is_some())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    CrLf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::CrLf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

/// Byte-level conventions of the source file, reproduced on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub bom: bool,
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl Default for TextLayout {
    // A fresh dictionary is written the way the desktop tool always wrote files.
    fn default() -> Self {
        Self {
            bom: true,
            line_ending: LineEnding::CrLf,
            trailing_newline: true,
        }
    }
}

/// What the grid shows for one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub reading: Reading,
    pub word: Word,
    pub is_conflict: bool,
    pub conflicting_words: Vec<Word>,
}

/// Returned by a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub alphabet: Vec<char>,
    pub entry_count: usize,
    pub duplicate_count: usize,
}
