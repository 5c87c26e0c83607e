//! Error taxonomy shared by the client state layer and the CRUD server.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Required field missing or malformed; raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", fields.join(", "))]
pub struct ValidationError {
    /// Violated field names (camelCase, dot paths for nested fields)
    pub fields: Vec<String>,
}

impl ValidationError {
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            fields: vec![name.into()],
        }
    }

    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }
}

/// Category of a normalized transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayErrorKind {
    Network,
    Timeout,
    Server,
    Conflict,
}

impl GatewayErrorKind {
    /// Classification of a non-2xx HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            408 | 504 => GatewayErrorKind::Timeout,
            404 | 409 | 412 => GatewayErrorKind::Conflict,
            _ => GatewayErrorKind::Server,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayErrorKind::Network => "network",
            GatewayErrorKind::Timeout => "timeout",
            GatewayErrorKind::Server => "server",
            GatewayErrorKind::Conflict => "conflict",
        }
    }
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote store failure as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    /// HTTP status when the store answered at all
    pub status: Option<u16>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Timeout, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Server, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Conflict, message)
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::from_status(status),
            message: message.into(),
            status: Some(status),
        }
    }
}

/// Error returned by every gateway and controller operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(e) => Some(e),
            StoreError::Gateway(_) => None,
        }
    }

    pub fn gateway_kind(&self) -> Option<GatewayErrorKind> {
        match self {
            StoreError::Gateway(e) => Some(e.kind),
            StoreError::Validation(_) => None,
        }
    }

    /// Human-readable text for a toast or inline message.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Validation(e) => {
                format!("Please fill in: {}", e.fields.join(", "))
            }
            StoreError::Gateway(e) => match e.kind {
                GatewayErrorKind::Network => {
                    "Could not reach the server. Check your connection and try again.".to_string()
                }
                GatewayErrorKind::Timeout => "The server took too long to respond.".to_string(),
                GatewayErrorKind::Conflict => format!("The record changed on the server: {}", e.message),
                GatewayErrorKind::Server => format!("The server rejected the change: {}", e.message),
            },
        }
    }
}

/// JSON body of a non-2xx response from the CRUD server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(GatewayErrorKind::from_status(404), GatewayErrorKind::Conflict);
        assert_eq!(GatewayErrorKind::from_status(409), GatewayErrorKind::Conflict);
        assert_eq!(GatewayErrorKind::from_status(408), GatewayErrorKind::Timeout);
        assert_eq!(GatewayErrorKind::from_status(422), GatewayErrorKind::Server);
        assert_eq!(GatewayErrorKind::from_status(500), GatewayErrorKind::Server);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::fields(["title", "imageUrl"]);
        assert_eq!(err.to_string(), "validation failed: title, imageUrl");
        assert!(err.contains("imageUrl"));
        assert!(!err.contains("startDate"));
    }

    #[test]
    fn test_store_error_conversions() {
        let err: StoreError = GatewayError::conflict("gone").into();
        assert_eq!(err.gateway_kind(), Some(GatewayErrorKind::Conflict));
        assert!(!err.is_validation());

        let err: StoreError = ValidationError::field("name").into();
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Please fill in: name");
    }

    #[test]
    fn test_error_body_omits_empty_fields() {
        let body = ErrorBody {
            message: "not found".into(),
            fields: vec![],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"message":"not found"}"#
        );
    }
}
