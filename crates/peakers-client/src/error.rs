//! # Client Error Types
//!
//! Everything that can go wrong between the POS and its backend.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Api { status, error,   │ │
//! │  │  InvalidUrl     │  │  (no response)  │  │        message }        │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Rejected (success=false│ │
//! │  └─────────────────┘  └─────────────────┘  │  Decode                 │ │
//! │                                            └─────────────────────────┘ │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Session      │  │     Local       │                              │
//! │  │  SessionIo, Io  │  │  Core (cart,    │                              │
//! │  │                 │  │  validation)    │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is retried. Every error ends up as one notice on screen.

use peakers_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Reason code the backend uses when a sale asks for more than is in stock.
pub const INSUFFICIENT_STOCK: &str = "INSUFFICIENT_STOCK";

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// No usable response (connection refused, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// Non-2xx response. `error` / `message` are the body fields, if any.
    #[error("Server returned {status}: {}", .error.as_deref().or(.message.as_deref()).unwrap_or("no details"))]
    Api {
        status: u16,
        error: Option<String>,
        message: Option<String>,
    },

    /// 2xx response whose body said `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// 2xx response that did not match the expected shape.
    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    // =========================================================================
    // Local Errors
    // =========================================================================
    #[error("Failed to access session file: {0}")]
    SessionIo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A local rule blocked the request before it was sent.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for notices)
// =============================================================================

impl ClientError {
    /// Builds an `Api` error from a status and a raw body.
    ///
    /// The body is parsed as `{error, message}` when it is JSON; anything
    /// else is kept as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            #[serde(default)]
            error: Option<String>,
            #[serde(default)]
            message: Option<String>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ClientError::Api {
                status,
                error: parsed.error.filter(|s| !s.is_empty()),
                message: parsed.message.filter(|s| !s.is_empty()),
            },
            Err(_) => ClientError::Api {
                status,
                error: None,
                message: Some(body.trim().to_string()).filter(|s| !s.is_empty()),
            },
        }
    }

    /// True when the server rejected a sale for lack of stock.
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, ClientError::Api { error: Some(e), .. } if e == INSUFFICIENT_STOCK)
    }

    /// True when no response came back at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// The text to show the user: the server's own words when it sent any,
    /// the local rule for blocked requests, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                error: Some(error), ..
            } if error == INSUFFICIENT_STOCK => self.server_message().unwrap_or(fallback).to_string(),
            ClientError::Api {
                error: Some(error), ..
            } => error.clone(),
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Rejected(message) if !message.is_empty() => message.clone(),
            ClientError::Core(core) => core.to_string(),
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_)
            | ClientError::SessionIo(_)
            | ClientError::Io(_) => self.to_string(),
            _ => fallback.to_string(),
        }
    }

    fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
