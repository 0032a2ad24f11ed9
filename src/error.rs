//! Error types for mystery-admin
//!
//! This module defines the error hierarchy used throughout the application.
//! Per-item remote failures are collected into reports; only the errors
//! here that reach an operation's return value are fatal to it.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Admin operation failed: {0}")]
    Admin(#[from] AdminError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed call against the chat workspace
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: f64 },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: invalid bot token")]
    Unauthorized,

    #[error("Forbidden: missing permissions for {action}")]
    Forbidden { action: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

impl DirectoryError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => DirectoryError::Unauthorized,
            403 => DirectoryError::Forbidden {
                action: "this operation".into(),
            },
            404 => DirectoryError::NotFound {
                resource: "requested resource".into(),
            },
            429 => DirectoryError::RateLimited {
                retry_after: parse_retry_after(body).unwrap_or(1.0),
            },
            _ => DirectoryError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            DirectoryError::Request(e) => e.is_timeout() || e.is_connect(),
            DirectoryError::RateLimited { .. } => true,
            DirectoryError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Extract `retry_after` (seconds) from a rate limit response body
fn parse_retry_after(body: &str) -> Option<f64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("retry_after")?
        .as_f64()
}

/// A channel whose name matches the game vocabulary but cannot be split
/// into the expected player segments
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[error("Cannot resolve players for channel '{channel}': {reason}")]
pub struct ClassificationAmbiguity {
    pub channel: String,
    pub reason: String,
}

impl ClassificationAmbiguity {
    pub fn new(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    pub fn no_split(channel: impl Into<String>) -> Self {
        Self::new(channel, "no split yields known character names")
    }

    pub fn many_splits(channel: impl Into<String>, count: usize) -> Self {
        Self::new(
            channel,
            format!("{} different splits yield known character names", count),
        )
    }

    pub fn empty_segment(channel: impl Into<String>) -> Self {
        Self::new(channel, "name has an empty player segment")
    }
}

/// Errors that abort a whole admin operation
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Failed to list {what}: {source}")]
    Listing {
        what: &'static str,
        #[source]
        source: DirectoryError,
    },
}

impl AdminError {
    pub fn listing(what: &'static str) -> impl FnOnce(DirectoryError) -> Self {
        move |source| AdminError::Listing { what, source }
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for directory calls
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Result type alias for admin operations
pub type AdminResult<T> = std::result::Result<T, AdminError>;
