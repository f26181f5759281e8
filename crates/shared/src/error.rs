use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Internal,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            _ => Self::Internal,
        }
    }
}

/// Body of a rejected API call.
///
/// Handled errors carry `detail` as a string; request validation failures
/// carry a list of field errors instead, which has no user-facing text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Lenient parse: anything that is not a JSON object yields an empty body.
    pub fn parse(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(detail)) if !detail.trim().is_empty() => Some(detail),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDomainError {
    #[error("unknown user type '{0}'")]
    UnknownUserType(String),
    #[error("unknown view '{0}'")]
    UnknownView(String),
}
