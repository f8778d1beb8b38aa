// File: src/core/filter.rs
//! Mapping between grid coordinates and readings.
//!
//! A grid cell is addressed by two glyphs (row, column). The active
//! [`KeyFilterState`] splices its fixed character into that pair, which is how
//! readings longer than two glyphs are reached from a 2-D grid.

use crate::core::alphabet::Alphabet;
use crate::core::types::{KeyFilterState, Reading, Word};
use std::collections::HashMap;

/// Reading addressed by grid cell `(row, col)` under `state`.
///
/// A position past the end of the pair appends the character.
pub fn expand(row: char, col: char, state: &KeyFilterState) -> Reading {
    let mut glyphs = vec![row, col];
    if let Some(c) = state.character {
        glyphs.insert(state.position.min(glyphs.len()), c);
    }
    glyphs.into_iter().collect()
}

/// Inverse of [`expand`]: the grid cell that shows `reading`, if any.
pub fn collapse(reading: &str, state: &KeyFilterState) -> Option<(char, char)> {
    let mut glyphs: Vec<char> = reading.chars().collect();
    if glyphs.len() != 2 + state.depth() {
        return None;
    }
    if let Some(c) = state.character {
        let position = state.position.min(2);
        if glyphs[position] != c {
            return None;
        }
        glyphs.remove(position);
    }
    Some((glyphs[0], glyphs[1]))
}

/// Conflicting readings visible under `state`, keyed by grid cell, each with its
/// words joined by `separator`. Cells whose glyphs are outside `alphabet` are skipped.
pub fn project_duplicates(
    duplicates: &HashMap<Reading, Vec<Word>>,
    state: &KeyFilterState,
    alphabet: &Alphabet,
    separator: &str,
) -> HashMap<(char, char), String> {
    duplicates
        .iter()
        .filter_map(|(reading, words)| {
            let (row, col) = collapse(reading, state)?;
            if !alphabet.contains(row) || !alphabet.contains(col) {
                return None;
            }
            Some(((row, col), words.join(separator)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(pairs: Vec<(&str, Vec<&str>)>) -> HashMap<Reading, Vec<Word>> {
        pairs
            .into_iter()
            .map(|(r, ws)| (r.to_string(), ws.iter().map(|w| w.to_string()).collect()))
            .collect()
    }

    #[test]
    fn expand_without_filter_is_the_pair() {
        assert_eq!(expand('a', 'b', &KeyFilterState::default()), "ab");
    }

    #[test]
    fn expand_splices_at_position() {
        let state = KeyFilterState::new(1, Some('x'));
        assert_eq!(expand('a', 'b', &state), "axb");
        assert_eq!(collapse("axb", &state), Some(('a', 'b')));

        let front = KeyFilterState::new(0, Some('x'));
        assert_eq!(expand('a', 'b', &front), "xab");
        assert_eq!(collapse("xab", &front), Some(('a', 'b')));

        let past_end = KeyFilterState::new(7, Some('x'));
        assert_eq!(expand('a', 'b', &past_end), "abx");
        assert_eq!(collapse("abx", &past_end), Some(('a', 'b')));
    }

    #[test]
    fn collapse_rejects_other_shapes() {
        let state = KeyFilterState::new(0, Some('x'));
        assert_eq!(collapse("ab", &state), None);
        assert_eq!(collapse("yab", &state), None);
        assert_eq!(collapse("xabc", &state), None);
        assert_eq!(collapse("abc", &KeyFilterState::default()), None);
    }

    #[test]
    fn projects_two_glyph_duplicates_without_filter() {
        let dups = group(vec![("ab", vec!["甲", "乙"]), ("xab", vec!["丙", "丁"])]);
        let cells = project_duplicates(&dups, &KeyFilterState::default(), &Alphabet::new(), "/");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[&('a', 'b')], "甲/乙");
    }

    #[test]
    fn projects_filtered_duplicates() {
        let dups = group(vec![("ab", vec!["甲", "乙"]), ("xab", vec!["丙", "丁"]), ("yab", vec!["戊", "己"])]);
        let state = KeyFilterState::new(0, Some('x'));
        let cells = project_duplicates(&dups, &state, &Alphabet::new(), "/");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[&('a', 'b')], "丙/丁");

        let middle = KeyFilterState::new(1, Some('a'));
        let cells = project_duplicates(&dups, &middle, &Alphabet::new(), "／");
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[&('x', 'b')], "丙／丁");
        assert_eq!(cells[&('y', 'b')], "戊／己");
    }

    #[test]
    fn skips_glyphs_outside_alphabet() {
        let dups = group(vec![("aé", vec!["甲", "乙"])]);
        let cells = project_duplicates(&dups, &KeyFilterState::default(), &Alphabet::new(), "/");
        assert!(cells.is_empty());

        let alphabet = Alphabet::discover(&["aé".to_string()]);
        let cells = project_duplicates(&dups, &KeyFilterState::default(), &alphabet, "/");
        assert_eq!(cells[&('a', 'é')], "甲/乙");
    }
}
