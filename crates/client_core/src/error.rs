use std::path::PathBuf;

use shared::error::ErrorCode;
use thiserror::Error;

/// Outcome of an API call that did not produce the expected body.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response was received (connect, DNS, timeout, broken body stream).
    #[error("api unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("api rejected request with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("unexpected api response body: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.status().map(ErrorCode::from_status)
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// User-facing text for a failed login or registration.
    ///
    /// A rejected call shows the server's `detail` when present, otherwise
    /// `rejected_fallback`. Anything without a usable response shows the
    /// connectivity message.
    pub fn user_message(&self, rejected_fallback: &str) -> String {
        match self {
            Self::Rejected { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| rejected_fallback.to_string()),
            Self::Unreachable(_) | Self::Decode(_) => crate::CONNECTION_FAILED_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to access token store at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token store at '{path}' is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a login or registration request is already in flight")]
    RequestInFlight,
    #[error("response arrived after the session changed; ignored")]
    Superseded,
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Transport(#[from] TransportError),
}
