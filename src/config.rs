// File: src/config.rs
use crate::core::types::SortMode;
use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const DEFAULT_BACKUP_DIR: &str = "mt_backup";

/// Tool settings, stored as JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory (next to the dictionary) that receives backups.
    pub backup_dir_name: String,
    /// Fail the load on lines that look like broken entries.
    pub strict_parse: bool,
    /// Sort mode a new session starts in.
    pub sort_mode: SortMode,
    /// Joins conflicting words when a cell is displayed.
    pub conflict_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backup_dir_name: DEFAULT_BACKUP_DIR.to_string(),
            strict_parse: false,
            sort_mode: SortMode::Natural,
            conflict_separator: "/".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| DictError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| DictError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let parent_dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir).map_err(|e| DictError::from_io(parent_dir, e))?;

        let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| DictError::from_io(path, e))?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| DictError::Config(e.to_string()))?;
            writer.flush().map_err(|e| DictError::from_io(path, e))?;
        }
        temp_file
            .persist(path)
            .map_err(|e| DictError::from_io(path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.backup_dir_name, "mt_backup");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict_tool.json");
        fs::write(&path, r#"{ "sortMode": "vowelsLast", "strictParse": true }"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.sort_mode, SortMode::VowelsLast);
        assert!(config.strict_parse);
        assert_eq!(config.conflict_separator, "/");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dict_tool.json");
        let config = Config {
            backup_dir_name: "bak".into(),
            conflict_separator: "／".into(),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict_tool.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(DictError::Config(_))));
    }
}
