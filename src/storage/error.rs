//! Error typedefs used by the storage backends

use thiserror::Error as ThisError;

/// The error produced from most Storage functions
#[derive(Debug, ThisError)]
pub enum StorageError {
    /// Unable to serialize data to store
    #[error("error on serialize data")]
    Serialize,
    /// Unable to deserialize data from store
    #[error("error on deserialize data")]
    Deserialize,
    /// Error on establishing a connection with the storage
    #[error("error on open connection: {0}")]
    Connection(String),
    /// Filesystem failure of the file backend
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// An unexpected error occurred
    #[error("{0:?}")]
    Other(String),
}
