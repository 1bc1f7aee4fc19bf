use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Backend HTTP errors.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("{message}")]
    Network { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server answered 2xx with an `ok: false` envelope.
    #[error("{message}")]
    Api {
        code: Option<String>,
        message: String,
    },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The request could not be built.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl TransportError {
    /// Backend error code, if the failure came from an envelope.
    pub fn code(&self) -> Option<&str> {
        match self {
            TransportError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::InvalidResponse {
            message: err.to_string(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for backend calls
pub type TransportResult<T> = Result<T, TransportError>;
