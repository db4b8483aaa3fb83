//! # Notices
//!
//! The terminal's version of a dialog box: a title and one message.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  command fn ──► Result<T, Notice>                                       │
//! │                     │                                                   │
//! │   CoreError ────────┤  title() from the rule that fired                 │
//! │   ClientError ──────┤  server text, else the command's fallback         │
//! │   bad input ────────┘  "Validation Error"                               │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │               "[Title] message" on stderr, exit code 1                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use peakers_client::ClientError;
use peakers_core::{CoreError, ValidationError};
use serde::Serialize;
use tracing::error;

pub const TITLE_ERROR: &str = "Error";
pub const TITLE_VALIDATION: &str = "Validation Error";
pub const TITLE_INSUFFICIENT_STOCK: &str = "Insufficient Stock";
pub const TITLE_SUCCESS: &str = "Success";

/// A titled message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

pub type CliResult<T> = Result<T, Notice>;

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::new(TITLE_ERROR, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Notice::new(TITLE_VALIDATION, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice::new(TITLE_SUCCESS, message)
    }

    /// Maps a client failure, using `fallback` when the server said nothing
    /// usable.
    pub fn from_client(err: ClientError, fallback: &str) -> Self {
        match err {
            ClientError::Core(core) => Notice::from(core),
            ref e if e.is_insufficient_stock() => {
                Notice::new(TITLE_INSUFFICIENT_STOCK, e.user_message(fallback))
            }
            e => {
                error!(error = %e, "Request failed");
                Notice::error(e.user_message(fallback))
            }
        }
    }
}

impl From<CoreError> for Notice {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => Notice::from(v),
            other => Notice::new(other.title(), other.to_string()),
        }
    }
}

impl From<ValidationError> for Notice {
    fn from(err: ValidationError) -> Self {
        Notice::validation(err.to_string())
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.title, self.message)
    }
}

impl std::error::Error for Notice {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_keep_their_titles() {
        let notice = Notice::from(CoreError::StockLimit { available: 3 });
        assert_eq!(notice.title, "Stock Limit");
        assert_eq!(notice.message, "Only 3 items available in stock");

        let notice = Notice::from(CoreError::OutOfStock {
            product: "Soda".to_string(),
        });
        assert_eq!(notice.to_string(), "[Out of Stock] Soda is out of stock.");
    }

    #[test]
    fn test_validation_errors() {
        let notice = Notice::from(ValidationError::Required {
            field: "Supplier name".to_string(),
        });
        assert_eq!(notice.title, TITLE_VALIDATION);
        assert_eq!(notice.message, "Supplier name is required");
    }

    #[test]
    fn test_client_errors() {
        let err = ClientError::from_response(
            400,
            r#"{"error": "INSUFFICIENT_STOCK", "message": "Only 1 Soda left"}"#,
        );
        let notice = Notice::from_client(err, "Error processing sale.");
        assert_eq!(notice.title, TITLE_INSUFFICIENT_STOCK);
        assert_eq!(notice.message, "Only 1 Soda left");

        let notice = Notice::from_client(ClientError::from_response(500, ""), "Failed to load orders");
        assert_eq!(notice, Notice::error("Failed to load orders"));

        let notice = Notice::from_client(CoreError::EmptyCart.into(), "x");
        assert_eq!(notice, Notice::error("Cart is empty."));
    }
}
