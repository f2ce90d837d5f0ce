use crate::common::StorageState;
use crate::error::ApiError;
use crate::page::Page;
use std::fmt::Debug;

/// Represents control over a web browser instance.
///
/// Launching is handled by a provider-specific constructor that returns
/// `Result<impl Browser, _>`, rather than being a method on the trait itself.
#[async_trait::async_trait]
pub trait Browser: Send + Sync + Debug {
    /// Opens a new page in a fresh, isolated browsing context.
    ///
    /// # Arguments
    /// * `state` - Storage to seed the context with before any navigation,
    ///   typically a snapshot taken by [`Page::storage_state`] after logging in.
    async fn new_page(&self, state: Option<&StorageState>) -> Result<Box<dyn Page>, ApiError>;

    /// Closes the browser instance and every page it owns.
    async fn close(&self) -> Result<(), ApiError>;

    /// Gets version information about the browser (format may vary).
    async fn version(&self) -> Result<String, ApiError>;
}
