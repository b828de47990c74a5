//! Error types shared by content providers and the feed controller.
//!
//! Only one failure kind originates below the controller: a page could not
//! be obtained.  Every variant is recoverable by calling `retry()`.

use std::time::Duration;

use thiserror::Error;

/// A failure to obtain one page from a content provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("malformed page: {0}")]
    Malformed(String),

    #[error("timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            // reqwest does not expose the configured duration on the error.
            Self::Timeout(Duration::ZERO)
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
