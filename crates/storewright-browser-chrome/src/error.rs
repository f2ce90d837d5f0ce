//! Error mapping for the Chrome provider

use chromiumoxide::error::CdpError;
use storewright_interfaces::ApiError;
use thiserror::Error;

/// Failures inside the Chrome provider. Mapped to [`ApiError`] at the crate boundary.
#[derive(Error, Debug)]
pub enum ChromeError {
    #[error("CDP error: {0}")]
    Cdp(#[from] CdpError),

    #[error("Invalid browser configuration: {0}")]
    Config(String),

    #[error("Navigation to {url} did not finish within {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("Unexpected script payload: {0}")]
    Payload(String),

    #[error("Page actor mailbox error: {0}")]
    Mailbox(#[from] actix::MailboxError),

    #[error("Page is closed")]
    PageClosed,
}

impl From<ChromeError> for ApiError {
    fn from(err: ChromeError) -> Self {
        match err {
            ChromeError::Cdp(e) => ApiError::ProtocolError(e.to_string()),
            ChromeError::Config(msg) => ApiError::LaunchError(msg),
            ChromeError::NavigationTimeout { url, timeout_ms } => ApiError::Timeout {
                what: format!("navigation to {}", url),
                timeout_ms,
            },
            ChromeError::Payload(msg) => ApiError::ProtocolError(msg),
            ChromeError::Mailbox(actix::MailboxError::Closed) => ApiError::TargetDetached,
            ChromeError::Mailbox(e) => ApiError::InternalError(format!("Page actor unavailable: {}", e)),
            ChromeError::PageClosed => ApiError::TargetDetached,
        }
    }
}
