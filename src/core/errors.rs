//! Custom error types for translation operations

use std::fmt;

use thiserror::Error;

/// Coarse classification of every [`TranslationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied text or language failed pre-flight checks
    Validation,
    /// Session bootstrap failed or a required token was missing
    SessionUnavailable,
    /// Network failure, non-success status or decompression failure
    Transport,
    /// Well-formed response without a usable translation
    ProviderTranslationFailure,
    /// Response body does not match the expected grammar
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::SessionUnavailable => write!(f, "session unavailable"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::ProviderTranslationFailure => write!(f, "provider translation failure"),
            ErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Invalid text or language tag
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
    },

    /// Landing page could not be fetched or lacked a token
    #[error("Session unavailable: {message}")]
    SessionUnavailable {
        message: String,
    },

    /// Provider answered with HTTP 429
    #[error("Too many requests: {message}")]
    RateLimitError {
        message: String,
    },

    /// Provider answered with another non-success status
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Declared content encoding could not be decoded
    #[error("Decode error ({encoding}): {message}")]
    DecodeError {
        encoding: String,
        message: String,
    },

    /// The caller cancelled the request
    #[error("Request cancelled")]
    Cancelled,

    /// Well-formed response that carried no translation
    #[error("{}", provider_message(.message))]
    ProviderError {
        code: u16,
        message: String,
    },

    /// Response body did not follow the provider's grammar
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn provider_message(message: &str) -> &str {
    if message.is_empty() {
        "translation failed"
    } else {
        message
    }
}

impl TranslationError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        TranslationError::ValidationError {
            message: message.into(),
        }
    }

    pub(crate) fn session(message: impl Into<String>) -> Self {
        TranslationError::SessionUnavailable {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        TranslationError::InvalidResponseError {
            message: message.into(),
        }
    }

    pub(crate) fn provider(code: u16, message: impl Into<String>) -> Self {
        TranslationError::ProviderError {
            code,
            message: message.into(),
        }
    }

    /// Which of the five failure families this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslationError::ValidationError { .. } | TranslationError::ConfigError { .. } => {
                ErrorKind::Validation
            }
            TranslationError::SessionUnavailable { .. } => ErrorKind::SessionUnavailable,
            TranslationError::RateLimitError { .. }
            | TranslationError::ApiError { .. }
            | TranslationError::NetworkError { .. }
            | TranslationError::DecodeError { .. }
            | TranslationError::Cancelled
            | TranslationError::HttpError(_) => ErrorKind::Transport,
            TranslationError::ProviderError { .. } => ErrorKind::ProviderTranslationFailure,
            TranslationError::InvalidResponseError { .. } | TranslationError::JsonError(_) => {
                ErrorKind::Parse
            }
        }
    }

    /// True for HTTP 429 responses
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, TranslationError::RateLimitError { .. })
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
