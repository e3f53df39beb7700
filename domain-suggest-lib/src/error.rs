//! Error handling for domain suggestion operations.
//!
//! This module defines a single error type covering every way the pipeline can
//! fail internally. Most of these never reach a caller of
//! [`DomainSuggester::generate_and_verify`](crate::DomainSuggester::generate_and_verify):
//! generation errors route to the fallback generator and lookup errors resolve
//! to a policy-chosen boolean.

use std::fmt;
use std::time::Duration;

/// Main error type for domain suggestion operations.
#[derive(Debug, Clone)]
pub enum SuggestError {
    /// The request was rejected before any work started
    InvalidRequest {
        field: String,
        reason: String,
    },

    /// The generation service failed or answered with something unusable
    GenerationError {
        message: String,
        status_code: Option<u16>,
    },

    /// Model output could not be parsed into candidates
    ParseError {
        message: String,
        content: Option<String>,
    },

    /// Registry lookup failed for a domain
    LookupError {
        domain: String,
        message: String,
    },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Rate limiting errors when a service rejects requests
    RateLimited {
        service: String,
        message: String,
    },

    /// Configuration errors (invalid settings, etc.)
    ConfigError {
        message: String,
    },

    /// File I/O errors when reading configuration
    FileError {
        path: String,
        message: String,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl SuggestError {
    /// Create a new invalid request error.
    pub fn invalid_request<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new generation error.
    pub fn generation<M: Into<String>>(message: M) -> Self {
        Self::GenerationError {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new generation error carrying the HTTP status.
    pub fn generation_with_status<M: Into<String>>(message: M, status_code: u16) -> Self {
        Self::GenerationError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
            content: None,
        }
    }

    /// Create a new lookup error.
    pub fn lookup<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::LookupError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new rate limited error.
    pub fn rate_limited<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::RateLimited {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error suggests the operation should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::RateLimited { .. }
                | Self::ParseError { .. }
                | Self::GenerationError { status_code: None, .. }
                | Self::GenerationError {
                    status_code: Some(500..=599),
                    ..
                }
        )
    }
}

impl fmt::Display for SuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest { field, reason } => {
                write!(f, "Invalid '{}': {}", field, reason)
            }
            Self::GenerationError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Generation error (HTTP {}): {}", code, message)
                } else {
                    write!(f, "Generation error: {}", message)
                }
            }
            Self::ParseError { message, content: _ } => {
                write!(f, "Parse error: {}", message)
            }
            Self::LookupError { domain, message } => {
                write!(f, "Lookup error for '{}': {}", domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::RateLimited { service, message } => {
                write!(f, "Rate limited by {}: {}", service, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for SuggestError {}

impl From<reqwest::Error> for SuggestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", Duration::from_secs(30))
        } else if let Some(status) = err.status() {
            Self::generation_with_status(err.to_string(), status.as_u16())
        } else {
            Self::generation(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for SuggestError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
            content: None,
        }
    }
}

impl From<std::io::Error> for SuggestError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<regex::Error> for SuggestError {
    fn from(err: regex::Error) -> Self {
        Self::Internal {
            message: format!("Regex error: {}", err),
        }
    }
}
