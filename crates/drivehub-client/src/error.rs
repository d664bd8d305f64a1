//! # Client Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Backend { message }    │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  UnexpectedResponse     │ │
//! │  │  ConfigLoad     │  │  Http { status }│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Session      │  │     Flow        │                              │
//! │  │  NotAuthenticated│ │  Payment        │                              │
//! │  │  SessionStorage │  │  Core(CoreError)│                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these is fatal: each is scoped to one user action.

use drivehub_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Backend unreachable.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Only possible when `api.request_timeout_secs` is set.
    #[error("Request timed out")]
    Timeout,

    /// Non-success HTTP status without a readable backend message.
    #[error("Backend returned HTTP {status}")]
    Http { status: u16 },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// The backend answered `{success: false, message}`.
    #[error("{message}")]
    Backend { message: String },

    #[error("Unexpected response from backend: {0}")]
    UnexpectedResponse(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    #[error("Please log in first")]
    NotAuthenticated,

    #[error("Session storage error: {0}")]
    SessionStorage(String),

    // =========================================================================
    // Flow Errors
    // =========================================================================
    /// Payment was declined or the payment step failed.
    #[error("Payment failed: {message}")]
    Payment { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::UnexpectedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
            }
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::UnexpectedResponse(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}
