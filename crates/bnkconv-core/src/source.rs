use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("bank file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read a whole bank file into memory.
///
/// # Errors
/// Returns `SourceError::NotFound` when the path does not exist and
/// `SourceError::Io` for any other read failure.
pub fn read_bank_file(path: &Path) -> Result<Vec<u8>, SourceError> {
    fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SourceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}
