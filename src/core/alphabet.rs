// File: src/core/alphabet.rs
use crate::core::types::{Reading, SortMode};

/// Lowercase letters followed by digits; always the first 36 rows/columns of the grid.
pub const BASE_GLYPHS: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Moved to the end of the grid in [`SortMode::VowelsLast`], in this order.
pub const VOWELS: [char; 5] = ['a', 'i', 'u', 'e', 'o'];

/// The glyph set that sizes the grid: the base glyphs plus whatever else the
/// loaded readings use. Built once per load and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    additional: Vec<char>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the non-base glyphs of `readings` in first-encounter order.
    pub fn discover<'a, I>(readings: I) -> Self
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        let mut additional = Vec::new();
        for reading in readings {
            for c in reading.chars() {
                if !BASE_GLYPHS.contains(&c) && !additional.contains(&c) {
                    additional.push(c);
                }
            }
        }
        Self { additional }
    }

    pub fn additional(&self) -> &[char] {
        &self.additional
    }

    /// Grid dimension.
    pub fn len(&self) -> usize {
        BASE_GLYPHS.len() + self.additional.len()
    }

    pub fn contains(&self, c: char) -> bool {
        BASE_GLYPHS.contains(&c) || self.additional.contains(&c)
    }

    /// Base glyphs followed by the additional ones.
    pub fn glyphs(&self) -> Vec<char> {
        BASE_GLYPHS.iter().chain(self.additional.iter()).copied().collect()
    }

    /// Display order of the glyphs. Storage order is never affected.
    pub fn order(&self, mode: SortMode) -> Vec<char> {
        let glyphs = self.glyphs();
        match mode {
            SortMode::Natural => glyphs,
            SortMode::VowelsLast => {
                let mut ordered: Vec<char> =
                    glyphs.into_iter().filter(|c| !VOWELS.contains(c)).collect();
                ordered.extend(VOWELS);
                ordered
            }
        }
    }
}
