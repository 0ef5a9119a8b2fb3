// src/error.rs
//! Application error types.
//!
//! Fatal conditions (configuration, output directories, database access)
//! surface as `AppError` from the export entry points. Per-entry failures are
//! also `AppError`s, but the exporter downgrades them to warnings and moves on.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded, back off and retry
    RateLimited,
    /// The requested object does not exist or is not shared with the integration
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entry '{page_id}' has no title")]
    MissingTitle { page_id: String },

    #[error("Image download failed for {url}: {reason}")]
    ImageDownload { url: String, reason: String },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error(transparent)]
    NotionClient(#[from] NotionClientError),
}

impl AppError {
    /// Whether retrying the failed operation might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkFailure(_) => true,
            AppError::NotionService { code, .. } => code.is_retryable(),
            AppError::NotionClient(NotionClientError::NotionApi { code, .. }) => {
                NotionErrorCode::from_api_response(code).is_retryable()
            }
            _ => false,
        }
    }
}

impl From<std::fmt::Error> for AppError {
    fn from(err: std::fmt::Error) -> Self {
        AppError::InternalError {
            message: "Formatting error".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Notion client error mapping
#[derive(Error, Debug)]
pub enum NotionClientError {
    #[error("Failed to deserialize response: {source}\nBody: {body}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Notion API error ({status}): {code} - {message}")]
    NotionApi {
        status: u32,
        code: String,
        message: String,
        request_id: Option<String>,
    },
}

/// Why an image could not be resolved to a local copy.
///
/// Resolution failures never fail a document; the renderer falls back to
/// the remote URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image was not localized: {0}")]
    NotLocalized(String),

    #[error("image download failed: {0}")]
    DownloadFailed(String),
}

/// Classification of why a database could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseFetchFailure {
    /// The database is a linked database (Notion API limitation).
    LinkedDatabase,
    /// The integration lacks permission to access this database.
    PermissionDenied { reason: String },
    /// The database was not found or is not shared with the integration.
    NotFound,
    Other { cause: String },
}

impl std::fmt::Display for DatabaseFetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LinkedDatabase => write!(
                f,
                "linked database (Notion API does not support querying linked databases)"
            ),
            Self::PermissionDenied { reason } => write!(f, "permission denied: {}", reason),
            Self::NotFound => write!(
                f,
                "database not found (is it shared with the integration?)"
            ),
            Self::Other { cause } => write!(f, "{}", cause),
        }
    }
}

/// Classifies a database access error into a domain-specific failure reason.
pub fn classify_database_fetch_failure(error: &AppError) -> DatabaseFetchFailure {
    match error {
        AppError::NotionClient(NotionClientError::NotionApi { message, code, .. }) => {
            classify_from_code_and_message(&NotionErrorCode::from_api_response(code), message)
        }
        AppError::NotionService { code, message, .. } => {
            classify_from_code_and_message(code, message)
        }
        _ => DatabaseFetchFailure::Other {
            cause: error.to_string(),
        },
    }
}

fn classify_from_code_and_message(code: &NotionErrorCode, message: &str) -> DatabaseFetchFailure {
    if message.contains("linked database") {
        DatabaseFetchFailure::LinkedDatabase
    } else if code.is_not_found() {
        DatabaseFetchFailure::NotFound
    } else if matches!(
        code,
        NotionErrorCode::RestrictedResource | NotionErrorCode::Unauthorized
    ) {
        DatabaseFetchFailure::PermissionDenied {
            reason: message.to_string(),
        }
    } else {
        DatabaseFetchFailure::Other {
            cause: format!("{}: {}", code, message),
        }
    }
}
