//! Errores de persistencia.
//! Mapea errores de IO / serde a variantes semánticas y al `StorageError`
//! que entiende el core.

use std::io::ErrorKind;

use funnel_core::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("transient IO error: {0}")]
    TransientIo(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut => Self::TransientIo(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<PersistenceError> for StorageError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Serialization(m) => StorageError::Serialization(m),
            PersistenceError::TransientIo(m) => StorageError::Unavailable(m),
            PersistenceError::InvalidNamespace(m) | PersistenceError::Io(m) => StorageError::Io(m),
        }
    }
}
