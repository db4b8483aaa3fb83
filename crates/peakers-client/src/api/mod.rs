//! REST endpoints, grouped by screen.
//!
//! Each module adds methods to [`ApiClient`](crate::http::ApiClient). Local
//! validation runs first; a request is only sent once the input is sound.

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod orders;
pub mod sales;
pub mod suppliers;

use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// `{success, message?}` acknowledgement used by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    /// `success: false` becomes `Rejected` with the server's message, or
    /// `fallback` when it sent none.
    pub(crate) fn into_result(self, fallback: &str) -> ClientResult<Option<String>> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ClientError::Rejected(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_failure_uses_server_text_or_fallback() {
        let ack: Ack = serde_json::from_str(r#"{"success": false, "message": "Unknown db"}"#).unwrap();
        assert_eq!(
            ack.into_result("Cannot connect to database").unwrap_err().to_string(),
            "Unknown db"
        );

        let ack: Ack = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(
            ack.into_result("Cannot connect to database").unwrap_err().to_string(),
            "Cannot connect to database"
        );

        let ack: Ack = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(ack.into_result("x").is_ok());
    }
}
