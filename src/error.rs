// File: src/error.rs
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("i/o error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8 (line {line})", .path.display())]
    Encoding { path: PathBuf, line: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed configuration file")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DictError>;

impl DictError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        DictError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
