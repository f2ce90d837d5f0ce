use crate::screen::{Screen, Transition};
use storewright_interfaces::ApiError;
use thiserror::Error;

/// Errors raised by page objects.
///
/// Form validation failures are *not* errors: they come back as values
/// (see [`crate::ContinueOutcome`] and `get_error_message`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// A bounded element-level wait expired.
    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    ElementTimeout { what: String, timeout_ms: u64 },

    /// A lookup by product name matched zero or several rows.
    #[error("Lookup of {name:?} matched {matches} rows, expected exactly one")]
    AmbiguousLookup { name: String, matches: usize },

    /// The page landed somewhere the state machine does not allow.
    #[error("Expected to land on one of {expected:?}, but the page shows {actual:?}")]
    UnexpectedScreen { expected: Vec<Screen>, actual: Screen },

    /// The requested action is not legal from the current screen.
    #[error("{transition:?} is not a legal action from {from:?}")]
    IllegalTransition { from: Screen, transition: Transition },

    /// The current URL does not belong to any known screen.
    #[error("URL does not map to a known screen: {0}")]
    UnknownScreen(String),

    /// A rendered amount could not be parsed.
    #[error("Cannot parse amount from {0:?}")]
    InvalidPrice(String),

    /// A rendered counter could not be parsed.
    #[error("Cannot parse cart badge from {0:?}")]
    InvalidBadge(String),

    /// A screen check (title, required controls) did not hold.
    #[error("Verification failed: {0}")]
    Verification(String),

    /// Writing a diagnostic capture failed.
    #[error("Diagnostic capture failed: {0}")]
    Diagnostic(String),

    /// Any other capability failure, passed through.
    #[error(transparent)]
    Api(ApiError),
}

impl PageError {
    /// Whether this failure should leave a page snapshot behind.
    pub fn wants_diagnostic(&self) -> bool {
        !matches!(self, PageError::Diagnostic(_) | PageError::InvalidBadge(_))
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout { what, timeout_ms } => PageError::ElementTimeout { what, timeout_ms },
            other => PageError::Api(other),
        }
    }
}
