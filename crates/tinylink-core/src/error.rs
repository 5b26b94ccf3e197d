use thiserror::Error;

/// Result type for mapping store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors reported by a mapping store adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The create-if-absent write found the key already occupied.
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage backend throttled the request: {0}")]
    Throttled(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Whether retrying the whole call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::Unavailable(_) | StorageError::Throttled(_) | StorageError::Timeout(_)
        )
    }
}

/// Client-caused input errors. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("url must not be empty")]
    EmptyUrl,
    #[error("url is {length} characters long, the limit is {max}")]
    UrlTooLong { length: usize, max: usize },
    #[error("url must not start or end with whitespace")]
    UrlWhitespace,
    #[error("url is malformed: {0}")]
    MalformedUrl(String),
    #[error("url scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("url must have a host")]
    MissingHost,
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors returned by the shortening and resolution operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StorageError),
    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Errors raised while building core configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("code length must be between {min} and {max}, got {length}")]
    InvalidCodeLength {
        length: usize,
        min: usize,
        max: usize,
    },
}
