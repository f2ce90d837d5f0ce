use thiserror::Error;

/// Errors surfaced by a capability provider.
/// These errors are intended to be protocol-agnostic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Failed to establish or maintain a connection to the browser.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A bounded wait did not observe the requested state in time.
    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    /// No element matched a locator that must resolve to exactly one element.
    #[error("No element matches {0}")]
    ElementNotFound(String),

    /// A single-element operation resolved to several elements.
    #[error("{locator} resolved to {count} elements, expected exactly one")]
    StrictModeViolation { locator: String, count: usize },

    /// The matched element cannot take this kind of input (e.g. `fill` on a button).
    #[error("Element {locator} does not support {operation}")]
    UnsupportedElement { locator: String, operation: String },

    /// An error reported by the underlying protocol (script error, rejected command).
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Navigation failed or targeted an invalid URL.
    #[error("Navigation failed: {0}")]
    NavigationError(String),

    /// The browser process unexpectedly terminated or crashed.
    #[error("Browser process crashed or closed unexpectedly")]
    BrowserCrashed,

    /// The page this handle refers to has been closed.
    #[error("Target detached or closed")]
    TargetDetached,

    /// Error related to launching the browser process.
    #[error("Failed to launch browser: {0}")]
    LaunchError(String),

    /// Invalid parameters were provided to a capability.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// An internal provider error. This may indicate a bug.
    #[error("Internal provider error: {0}")]
    InternalError(String),

    /// Generic I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl ApiError {
    pub fn timeout(what: impl Into<String>, timeout: std::time::Duration) -> Self {
        ApiError::Timeout {
            what: what.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ProtocolError(format!("Malformed JSON payload: {}", err))
    }
}
