use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BundlerError>;

#[derive(Error, Debug)]
pub enum BundlerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no directories specified")]
    NoDirectories,

    #[error("Invalid directory: {0}")]
    InvalidPath(String),

    #[error("could not read ignore file {}: {source}", .path.display())]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not walk {}: {message}", .root.display())]
    Walk { root: PathBuf, message: String },

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("nothing to bundle: no files could be read")]
    NothingToBundle,

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        /// Parts fully written before the failure.
        written: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}
