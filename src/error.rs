use thiserror::Error;

use crate::column::DataType;

/// Error type for indexing operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: i64, size: usize },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid key shape: {0}")]
    InvalidKeyShape(String),

    #[error("Inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Cannot cast {from:?} to {to:?}")]
    Cast { from: DataType, to: DataType },

    #[error("No common type for {0:?}")]
    NoCommonType(Vec<DataType>),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Re-raise any resolution failure as `KeyNotFound` for the given key.
    ///
    /// `.loc` hides its resolution strategy from callers; only column lookups keep
    /// their own kind since they never go through label resolution.
    pub(crate) fn into_key_not_found(self, key: &impl std::fmt::Debug) -> Self {
        match self {
            Error::KeyNotFound(_) | Error::ColumnNotFound(_) | Error::ShapeMismatch(_) => self,
            Error::UnsupportedOperation(_) | Error::InvalidKeyShape(_) => self,
            other => {
                log::debug!("loc resolution failed ({}), reporting as missing key", other);
                Error::KeyNotFound(format!("{:?}", key))
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
