//! Error types for the CNG savings tracker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any storage access (non-positive denominator,
    /// negative cost, non-finite value). Correctable by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The storage backend could not complete the operation.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying the same call might succeed.
    ///
    /// Input errors never succeed on retry; storage failures may.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StorageUnavailable(_) | Error::Io(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::StorageUnavailable(format!("connection pool: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(Error::StorageUnavailable("down".into()).is_retryable());
        assert!(!Error::InvalidInput("distance_covered must be positive".into()).is_retryable());
    }

    #[test]
    fn test_rusqlite_error_maps_to_storage() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::StorageUnavailable(_)));
    }
}
