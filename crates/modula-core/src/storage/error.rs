//! Errors raised while reading and writing configuration files.
use std::path::PathBuf;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during '{operation}' on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {format} config: {source}")]
    Serialize {
        format: String,
        #[source]
        source: BoxedSource,
    },

    #[error("Cannot read {format} config: {source}")]
    Deserialize {
        format: String,
        #[source]
        source: BoxedSource,
    },

    /// The file extension names no enabled config format
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("Cannot write '{}': path has no parent directory", .0.display())]
    NoParentDirectory(PathBuf),
}

impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io { source, operation: operation.into(), path }
    }
}
