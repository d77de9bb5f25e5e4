use lambda_http::http::StatusCode;
use thiserror::Error;

/// Result alias used across the atoms.
pub type AtomResult<T> = Result<T, AtomError>;

/// Every failure an atom can report, grouped by how the API answers it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AtomError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No valid session on the request.
    #[error("authentication required")]
    Unauthorized,

    /// The session is valid but the entity belongs to somebody else.
    #[error("{0}")]
    Forbidden(String),

    /// The entity does not exist (or no longer exists).
    #[error("{0} not found")]
    NotFound(String),

    /// The request contradicts the current state of the entity.
    #[error("{0}")]
    Conflict(String),

    /// Object storage failed (signing, transfer, expired URL).
    #[error("storage error: {0}")]
    Storage(String),

    /// The database failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl AtomError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind written into the `error` field of responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::NotFound(_) => "NotFound",
            Self::Conflict(_) => "Conflict",
            Self::Storage(_) => "StorageError",
            Self::Persistence(_) => "InternalError",
        }
    }

    /// Message safe to show to the user. Server-side detail stays in the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) => "Something went wrong. Please try again later.".to_string(),
            Self::Storage(_) => "File storage is unavailable. Please retry the upload.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error returned when a stored or submitted enum value is unknown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl From<ParseEnumError> for AtomError {
    fn from(err: ParseEnumError) -> Self {
        AtomError::Validation(err.to_string())
    }
}
