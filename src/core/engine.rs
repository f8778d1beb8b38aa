use crate::config::Config;
use crate::core::filter::{expand, project_duplicates};
use crate::core::store::DictionaryStore;
use crate::core::types::{Cell, KeyFilterState, LoadSummary, SortMode};
use crate::core::validation::is_acceptable_word;
use crate::error::{DictError, Result};
use crate::persistence::{load_from_disk, save_to_disk};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One editing session: a loaded dictionary plus the grid view settings.
///
/// The grid is indexed by positions in [`grid_glyphs`](Self::grid_glyphs), which
/// depend on the loaded alphabet and the sort mode.
pub struct DictionaryEngine {
    config: Config,
    store: DictionaryStore,
    current_file: Option<PathBuf>,
    sort_mode: SortMode,
    filter: KeyFilterState,
}

impl DictionaryEngine {
    pub fn new(config: Config) -> Self {
        Self {
            sort_mode: config.sort_mode,
            config,
            store: DictionaryStore::new(),
            current_file: None,
            filter: KeyFilterState::default(),
        }
    }

    /// Loads `path`, replacing the session's dictionary. On error the previous
    /// dictionary stays loaded.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadSummary> {
        let store = load_from_disk(path, self.config.strict_parse)?;
        self.store = store;
        self.current_file = Some(path.to_path_buf());
        if let Some(c) = self.filter.character {
            if !self.store.alphabet().contains(c) {
                debug!(glyph = %c, "filter glyph not in new alphabet, clearing filter");
                self.filter = KeyFilterState::default();
            }
        }

        let summary = LoadSummary {
            alphabet: self.store.alphabet().glyphs(),
            entry_count: self.store.entry_count(),
            duplicate_count: self.store.duplicates().len(),
        };
        info!(
            path = %path.display(),
            entries = summary.entry_count,
            duplicates = summary.duplicate_count,
            grid = summary.alphabet.len(),
            "dictionary loaded"
        );
        Ok(summary)
    }

    /// Row/column glyphs in display order.
    pub fn grid_glyphs(&self) -> Vec<char> {
        self.store.alphabet().order(self.sort_mode)
    }

    fn glyph_pair(&self, row: usize, col: usize) -> Result<(char, char)> {
        let glyphs = self.grid_glyphs();
        match (glyphs.get(row), glyphs.get(col)) {
            (Some(&r), Some(&c)) => Ok((r, c)),
            _ => Err(DictError::CellOutOfRange {
                row,
                col,
                size: glyphs.len(),
            }),
        }
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Result<Cell> {
        let (r, c) = self.glyph_pair(row, col)?;
        self.cell_by_glyphs(r, c)
    }

    fn check_glyph(&self, glyph: char) -> Result<()> {
        if self.store.alphabet().contains(glyph) {
            Ok(())
        } else {
            Err(DictError::UnknownGlyph(glyph))
        }
    }

    /// Cell at grid glyphs `(row, col)`. Both must be in the loaded alphabet.
    pub fn cell_by_glyphs(&self, row: char, col: char) -> Result<Cell> {
        self.check_glyph(row)?;
        self.check_glyph(col)?;
        let reading = expand(row, col, &self.filter);
        let conflicting_words = self
            .store
            .conflicts(&reading)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        Ok(Cell {
            word: self.store.get(&reading).to_string(),
            is_conflict: !conflicting_words.is_empty(),
            conflicting_words,
            reading,
        })
    }

    /// Stores `word` in the cell. An empty word deletes the reading; any other
    /// word must pass [`is_acceptable_word`]. Resolves a conflict on the reading.
    pub fn set_cell(&mut self, row: usize, col: usize, word: &str) -> Result<()> {
        let (r, c) = self.glyph_pair(row, col)?;
        self.set_cell_by_glyphs(r, c, word)
    }

    pub fn set_cell_by_glyphs(&mut self, row: char, col: char, word: &str) -> Result<()> {
        self.check_glyph(row)?;
        self.check_glyph(col)?;
        if !is_acceptable_word(word) {
            return Err(DictError::InvalidWord(word.to_string()));
        }
        let reading = expand(row, col, &self.filter);
        self.store.set(&reading, word);
        Ok(())
    }

    /// Display text of every cell, with unresolved conflicts shown as their
    /// joined words.
    pub fn grid_view(&self) -> Vec<Vec<String>> {
        let glyphs = self.grid_glyphs();
        let conflicts = project_duplicates(
            self.store.duplicates(),
            &self.filter,
            self.store.alphabet(),
            &self.config.conflict_separator,
        );
        glyphs
            .iter()
            .map(|&r| {
                glyphs
                    .iter()
                    .map(|&c| match conflicts.get(&(r, c)) {
                        Some(joined) => joined.clone(),
                        None => self.store.get(&expand(r, c, &self.filter)).to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    /// Writes the dictionary. `None` overwrites the current file; `Some` saves to
    /// a new path and makes it current. Unresolved duplicates need `confirmed`.
    ///
    /// Returns the backup of the overwritten file, if one was made.
    pub fn save_file(&mut self, path: Option<&Path>, confirmed: bool) -> Result<Option<PathBuf>> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self.current_file.clone().ok_or(DictError::NoActiveFile)?,
        };

        let unresolved = self.store.duplicates().len();
        if unresolved > 0 {
            if !confirmed {
                return Err(DictError::UnresolvedDuplicates { count: unresolved });
            }
            warn!(count = unresolved, "saving with unresolved duplicates");
        }

        let backup = save_to_disk(&self.store, &target, &self.config.backup_dir_name)?;
        self.current_file = Some(target);
        Ok(backup)
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Sets the splice rule. The character must be in the loaded alphabet;
    /// `None` returns the grid to plain 2-glyph readings.
    pub fn set_filter(&mut self, position: usize, character: Option<char>) -> Result<()> {
        if let Some(c) = character {
            self.check_glyph(c)?;
        }
        self.filter = KeyFilterState::new(position, character);
        Ok(())
    }

    pub fn filter(&self) -> KeyFilterState {
        self.filter
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for DictionaryEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
