use thiserror::Error;

use crate::scoredata::{DecodeError, DecodeFailure};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to decode score data: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode score data: {0}")]
    Encode(String),

    #[error("Invalid chart fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("Invalid score key: {0}")]
    InvalidScoreKey(String),

    #[error("Failed to walk songs folder: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<DecodeFailure> for Error {
    fn from(failure: DecodeFailure) -> Self {
        Error::Decode(failure.error)
    }
}

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::Io(other_io_err);
        assert!(!err2.is_not_found());
    }

    #[test]
    fn test_decode_failure_converts_to_inner_error() {
        let failure = DecodeFailure {
            error: DecodeError::HeaderTooShort { len: 3 },
            records: Vec::new(),
        };
        let err: Error = failure.into();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::HeaderTooShort { len: 3 })
        ));
    }
}
