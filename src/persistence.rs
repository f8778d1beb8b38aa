// File: src/persistence.rs
use crate::core::store::DictionaryStore;
use crate::core::types::SourceLine;
use crate::error::{DictError, Result};
use chrono::Local;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Reads a dictionary file as UTF-8 text. The BOM, if any, is left in place for
/// [`DictionaryStore::parse`] to record.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| DictError::from_io(path, e))?;
    String::from_utf8(bytes).map_err(|source| DictError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_from_disk(path: &Path, strict: bool) -> Result<DictionaryStore> {
    let text = read_text(path)?;
    DictionaryStore::parse(&text, strict)
}

/// Renders the store back to text.
///
/// Source lines are walked in order: deleted readings are dropped, unresolved
/// duplicates are re-emitted verbatim, resolved duplicates collapse onto their first
/// line and everything else is rewritten with its current word. Readings that never
/// appeared in the source are appended in creation order.
pub fn render(store: &DictionaryStore) -> String {
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut lines: Vec<String> = Vec::with_capacity(store.source_lines().len());

    for line in store.source_lines() {
        match line {
            SourceLine::Entry { reading, .. } => {
                let current = store.get(reading);
                if current.is_empty() {
                    emitted.insert(reading);
                } else if store.conflicts(reading).is_some() {
                    emitted.insert(reading);
                    lines.push(line.render());
                } else if emitted.insert(reading) {
                    lines.push(format!("{}={}", reading, current));
                }
            }
            SourceLine::Other(text) => lines.push(text.clone()),
        }
    }

    for (reading, word) in store.entries() {
        if !emitted.contains(reading.as_str()) && !word.is_empty() {
            lines.push(format!("{}={}", reading, word));
        }
    }

    let layout = store.layout();
    let ending = layout.line_ending.as_str();
    let mut out = String::new();
    if layout.bom {
        out.push('\u{feff}');
    }
    out.push_str(&lines.join(ending));
    if layout.trailing_newline && !lines.is_empty() {
        out.push_str(ending);
    }
    out
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Moves an existing file at `path` into `<parent>/<backup_dir_name>/` under a
/// timestamped name. Returns the backup path, or `None` if there was nothing to move.
pub fn backup(path: &Path, backup_dir_name: &str) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let backup_err = |source: io::Error| DictError::Backup {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| backup_err(io::Error::new(io::ErrorKind::InvalidInput, "no file name")))?;

    let backup_dir = parent_dir(path).join(backup_dir_name);
    fs::create_dir_all(&backup_dir).map_err(backup_err)?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S_%6f").to_string();
    let mut target = backup_dir.join(format!("{}_{}", stamp, file_name));
    let mut n = 1;
    while target.exists() {
        target = backup_dir.join(format!("{}_{}_{}", stamp, n, file_name));
        n += 1;
    }

    fs::rename(path, &target).map_err(backup_err)?;
    debug!(from = %path.display(), to = %target.display(), "backup created");
    Ok(Some(target))
}

/// Writes the store to `path`, backing up whatever was there first.
///
/// The new text is staged in a temp file next to `path` before the backup runs, so
/// a failed backup leaves the target untouched. A crash between the backup rename
/// and the final persist leaves `path` absent with the backup intact.
pub fn save_to_disk(
    store: &DictionaryStore,
    path: &Path,
    backup_dir_name: &str,
) -> Result<Option<PathBuf>> {
    let parent = parent_dir(path);
    let io_err = |e: io::Error| DictError::from_io(path, e);

    let text = render(store);
    let mut temp_file = NamedTempFile::new_in(parent).map_err(io_err)?;
    temp_file.write_all(text.as_bytes()).map_err(io_err)?;
    temp_file.as_file().sync_all().map_err(io_err)?;

    let backup_path = backup(path, backup_dir_name)?;

    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    info!(
        path = %path.display(),
        bytes = text.len(),
        backup = ?backup_path,
        "dictionary saved"
    );
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) -> String {
        render(&DictionaryStore::parse(text, false).unwrap())
    }

    #[test]
    fn untouched_files_render_identically() {
        for text in [
            "\u{feff}# comment\r\nka=蚊\r\n\r\nki=木\r\n",
            "ka=蚊\nki=木",
            "ka=蚊\n\n\n",
            "\n",
            "",
            "a=b=c\r\nka=蚊\r\n",
            "ka=蚊\nki=木\r",
            "ka=蚊\r\n\r",
        ] {
            assert_eq!(round_trip(text), text);
        }
    }

    #[test]
    fn deleted_reading_is_omitted() {
        let mut store = DictionaryStore::parse("ka=蚊\nki=木\n", false).unwrap();
        store.set("ka", "");
        assert_eq!(render(&store), "ki=木\n");
    }

    #[test]
    fn edits_are_written_in_place() {
        let mut store = DictionaryStore::parse("#x\nka=蚊\nki=木\n", false).unwrap();
        store.set("ka", "課");
        assert_eq!(render(&store), "#x\nka=課\nki=木\n");
    }

    #[test]
    fn new_entries_are_appended_in_creation_order() {
        let mut store = DictionaryStore::parse("ka=蚊\r\n", false).unwrap();
        store.set("zz", "終");
        store.set("ab", "始");
        store.set("xy", "");
        assert_eq!(render(&store), "ka=蚊\r\nzz=終\r\nab=始\r\n");
    }

    #[test]
    fn unresolved_duplicates_are_kept_verbatim() {
        let store = DictionaryStore::parse("ab=x\nab=y\n", false).unwrap();
        assert_eq!(render(&store), "ab=x\nab=y\n");
    }

    #[test]
    fn resolved_duplicates_collapse_to_first_line() {
        let mut store = DictionaryStore::parse("ab=x\nka=蚊\nab=y\n", false).unwrap();
        store.set("ab", "z");
        assert_eq!(render(&store), "ab=z\nka=蚊\n");
    }

    #[test]
    fn deleting_a_duplicate_drops_every_line() {
        let mut store = DictionaryStore::parse("ab=x\nab=y\nka=蚊\n", false).unwrap();
        store.set("ab", "");
        assert_eq!(render(&store), "ka=蚊\n");
    }

    #[test]
    fn fresh_store_writes_bom_and_crlf() {
        let mut store = DictionaryStore::new();
        store.set("ka", "蚊");
        assert_eq!(render(&store), "\u{feff}ka=蚊\r\n");
    }

    #[test]
    fn backup_moves_file_into_backup_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        fs::write(&path, "ka=蚊\n").unwrap();

        let first = backup(&path, "mt_backup").unwrap().unwrap();
        assert!(!path.exists());
        assert_eq!(first.parent().unwrap(), dir.path().join("mt_backup"));
        assert!(first.file_name().unwrap().to_str().unwrap().ends_with("_dict.txt"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "ka=蚊\n");

        assert_eq!(backup(&path, "mt_backup").unwrap(), None);
    }

    #[test]
    fn rapid_backups_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        let mut seen = HashSet::new();
        for i in 0..5 {
            fs::write(&path, format!("ka={}\n", i)).unwrap();
            let target = backup(&path, "mt_backup").unwrap().unwrap();
            assert!(seen.insert(target));
        }
        assert_eq!(fs::read_dir(dir.path().join("mt_backup")).unwrap().count(), 5);
    }

    #[test]
    fn failed_backup_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        fs::write(&path, "ka=蚊\n").unwrap();
        // A plain file where the backup directory should go.
        fs::write(dir.path().join("mt_backup"), "").unwrap();

        let mut store = DictionaryStore::parse("ka=蚊\n", false).unwrap();
        store.set("ka", "課");
        let err = save_to_disk(&store, &path, "mt_backup").unwrap_err();
        assert!(matches!(err, DictError::Backup { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "ka=蚊\n");
    }

    #[test]
    fn decode_error_on_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0x6b, 0x61, 0x3d, 0xff, 0xfe]).unwrap();
        assert!(matches!(read_text(&path), Err(DictError::Decode { .. })));
        assert!(matches!(
            read_text(&dir.path().join("missing.txt")),
            Err(DictError::NotFound(_))
        ));
    }
}
