// File: src/error.rs
use std::path::PathBuf;
use std::string::FromUtf8Error;

/// Every failure the dictionary engine reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("dictionary file not found: {0}")]
    NotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("malformed entry on line {line_no}: {line:?}")]
    MalformedLine { line_no: usize, line: String },

    /// The previous file could not be moved aside; nothing was written.
    #[error("backup of {path} failed: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Save refused until the caller confirms.
    #[error("{count} reading(s) still have conflicting entries")]
    UnresolvedDuplicates { count: usize },

    #[error("no dictionary file is open")]
    NoActiveFile,

    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    CellOutOfRange { row: usize, col: usize, size: usize },

    #[error("glyph {0:?} is not in the dictionary's alphabet")]
    UnknownGlyph(char),

    #[error("word contains ASCII characters: {0:?}")]
    InvalidWord(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DictError>;

impl DictError {
    /// Maps a read/write failure onto the taxonomy the UI distinguishes.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => DictError::NotFound(path),
            std::io::ErrorKind::PermissionDenied => DictError::PermissionDenied(path),
            _ => DictError::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn io_kinds_map_onto_taxonomy() {
        let path = PathBuf::from("dict.txt");
        assert!(matches!(
            DictError::from_io(&path, Error::from(ErrorKind::PermissionDenied)),
            DictError::PermissionDenied(p) if p == path
        ));
        assert!(matches!(
            DictError::from_io(&path, Error::from(ErrorKind::NotFound)),
            DictError::NotFound(p) if p == path
        ));
        match DictError::from_io(&path, Error::from(ErrorKind::InvalidData)) {
            DictError::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), ErrorKind::InvalidData);
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }
}
