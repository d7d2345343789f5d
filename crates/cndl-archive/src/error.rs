use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {source}")]
    Corrupted { source: io::Error },

    #[error("entry path contains invalid data: {source}")]
    InvalidPath { source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error(
        "archive does not contain the expected top-level directory '{expected}' (found: {found:?})"
    )]
    UnexpectedArchiveLayout { expected: PathBuf, found: Vec<String> },

    #[error("'{path}' is left over from an earlier run; remove it and retry")]
    StaleExtraction { path: PathBuf },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to move '{from}' to '{to}': {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
