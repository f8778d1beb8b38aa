// File: src/core/store.rs
use crate::core::alphabet::Alphabet;
use crate::core::types::{LineEnding, Reading, SourceLine, TextLayout, Word};
use crate::error::{DictError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

const BOM: char = '\u{feff}';

/// The loaded dictionary.
///
/// `entries` always holds the last word seen for a reading; `duplicates` keeps the
/// full conflicting history for readings that appeared on more than one line.
/// Every key of `duplicates` is also a key of `entries`.
#[derive(Debug, Clone, Default)]
pub struct DictionaryStore {
    entries: HashMap<Reading, Word>,
    /// Readings in order of first appearance (file order, then creation order).
    order: Vec<Reading>,
    duplicates: HashMap<Reading, Vec<Word>>,
    source_lines: Vec<SourceLine>,
    alphabet: Alphabet,
    layout: TextLayout,
}

impl DictionaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses dictionary text. With `strict` set, a line that looks like an entry
    /// but cannot be one fails the load instead of being passed through.
    pub fn parse(text: &str, strict: bool) -> Result<Self> {
        let (bom, body) = match text.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let layout = TextLayout {
            bom,
            line_ending: if body.contains("\r\n") {
                LineEnding::CrLf
            } else if body.contains('\n') {
                LineEnding::Lf
            } else {
                LineEnding::CrLf
            },
            trailing_newline: body.is_empty() || body.ends_with('\n'),
        };

        let mut store = Self {
            layout,
            ..Self::default()
        };

        let body = body.strip_suffix('\n').unwrap_or(body);
        if body.is_empty() && !text.ends_with('\n') {
            return Ok(store);
        }

        let raws: Vec<&str> = body.split('\n').collect();
        let last = raws.len() - 1;
        for (idx, raw) in raws.into_iter().enumerate() {
            // A final `\r` with no `\n` after it is content, not a terminator.
            let line = if idx < last || layout.trailing_newline {
                raw.strip_suffix('\r').unwrap_or(raw)
            } else {
                raw
            };
            match split_entry(line) {
                Some((reading, word)) => {
                    if strict && reading.chars().count() < 2 {
                        return Err(DictError::MalformedLine {
                            line_no: idx + 1,
                            line: line.to_string(),
                        });
                    }
                    store.record(reading, word);
                    store.source_lines.push(SourceLine::Entry {
                        reading: reading.to_string(),
                        word: word.to_string(),
                    });
                }
                None => {
                    if line.contains('=') {
                        if strict {
                            return Err(DictError::MalformedLine {
                                line_no: idx + 1,
                                line: line.to_string(),
                            });
                        }
                        warn!(line_no = idx + 1, line, "passing malformed entry through");
                    }
                    store.source_lines.push(SourceLine::Other(line.to_string()));
                }
            }
        }

        store.alphabet = Alphabet::discover(&store.order);
        debug!(
            entries = store.entries.len(),
            duplicates = store.duplicates.len(),
            additional_glyphs = store.alphabet.additional().len(),
            "parsed dictionary"
        );
        Ok(store)
    }

    /// Folds one source entry into the maps.
    fn record(&mut self, reading: &str, word: &str) {
        if let Some(previous) = self.entries.get(reading) {
            let group = self
                .duplicates
                .entry(reading.to_string())
                .or_insert_with(|| vec![previous.clone()]);
            group.push(word.to_string());
            debug!(reading, conflicts = group.len(), "duplicate reading");
        } else {
            self.order.push(reading.to_string());
        }
        self.entries.insert(reading.to_string(), word.to_string());
    }

    /// Current word of `reading`, empty if unknown or deleted.
    pub fn get(&self, reading: &str) -> &str {
        self.entries.get(reading).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, reading: &str) -> bool {
        self.entries.contains_key(reading)
    }

    /// Overwrites `reading`. Supplying a value resolves any conflict on it;
    /// an empty `word` deletes the reading on the next write.
    pub fn set(&mut self, reading: &str, word: &str) {
        if !self.entries.contains_key(reading) {
            self.order.push(reading.to_string());
        }
        self.entries.insert(reading.to_string(), word.to_string());
        if let Some(group) = self.duplicates.remove(reading) {
            debug!(reading, discarded = group.len(), "duplicate resolved");
        }
    }

    /// Conflicting words of `reading` in file order, if it is still unresolved.
    pub fn conflicts(&self, reading: &str) -> Option<&[Word]> {
        self.duplicates.get(reading).map(Vec::as_slice)
    }

    pub fn duplicates(&self) -> &HashMap<Reading, Vec<Word>> {
        &self.duplicates
    }

    /// Unresolved readings in file order.
    pub fn duplicate_readings(&self) -> Vec<&Reading> {
        self.order
            .iter()
            .filter(|r| self.duplicates.contains_key(*r))
            .collect()
    }

    /// Readings with their current words, in first-appearance order.
    pub fn entries(&self) -> impl Iterator<Item = (&Reading, &Word)> {
        self.order
            .iter()
            .filter_map(move |r| self.entries.get(r).map(|w| (r, w)))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn source_lines(&self) -> &[SourceLine] {
        &self.source_lines
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn layout(&self) -> TextLayout {
        self.layout
    }
}

/// Splits `reading=word`; `None` unless there is exactly one `=` and a reading.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (reading, word) = line.split_once('=')?;
    if reading.is_empty() || word.contains('=') {
        return None;
    }
    Some((reading, word))
}
