//! Unified error types for howpopular.

use tokio_rusqlite::rusqlite;

/// Guidance shown when certificate verification fails.
pub const TLS_GUIDANCE: &str = "[ERROR] Encountered an SSL Error. Try using HTTP instead of HTTPS by setting \
                                the environment variable \"HOWPOPULAR_DISABLE_SSL\".";

/// Unified error types for howpopular.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a provider template without a slot).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Connection could not be established or was dropped mid-request.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// TLS certificate verification failed.
    #[error("TLS_ERROR: {0}")]
    Tls(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Cache directory or file could not be created or removed.
    #[error("CACHE_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this failure means the network is unavailable for the batch.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Tls(_))
    }

    /// Remediation text to show the user alongside the error, if any.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Error::Tls(_) => Some(TLS_GUIDANCE),
            _ => None,
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
