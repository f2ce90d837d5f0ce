use crate::common::*;
use crate::error::ApiError;
use crate::locator::Locator;
use std::fmt::Debug;
use std::time::Duration;

/// Represents a single live browser page (tab).
///
/// This trait is the capability set the page objects are written against.
/// Every element-addressing method takes a [`Locator`] that is resolved at call
/// time; single-element operations (`click`, `fill`, `select_option`,
/// `text_content`) require the locator to resolve to exactly one element.
/// Only `wait_for` waits; every other method acts on the DOM as it is now.
#[async_trait::async_trait]
pub trait Page: Send + Sync + Debug {
    /// Navigates the page to the specified URL and waits for the load event.
    async fn navigate(&self, url: &str) -> Result<(), ApiError>;

    /// Gets the current URL of the page.
    async fn url(&self) -> Result<String, ApiError>;

    /// Waits until `locator` reaches `state`.
    ///
    /// # Returns
    /// - `Ok(())` once the state is observed.
    /// - `Err(ApiError::Timeout)` if `timeout` elapses first.
    async fn wait_for(
        &self,
        locator: &Locator,
        state: WaitState,
        timeout: Duration,
    ) -> Result<(), ApiError>;

    /// Clicks the single element matched by `locator`.
    async fn click(&self, locator: &Locator) -> Result<(), ApiError>;

    /// Replaces the value of the single input matched by `locator`.
    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), ApiError>;

    /// Selects the option with `value` in the single `<select>` matched by `locator`.
    async fn select_option(&self, locator: &Locator, value: &str) -> Result<(), ApiError>;

    /// Text content of the single element matched by `locator`.
    ///
    /// # Returns
    /// - `Ok(None)` if nothing matches.
    /// - `Err(ApiError::StrictModeViolation)` if several elements match.
    async fn text_content(&self, locator: &Locator) -> Result<Option<String>, ApiError>;

    /// Text content of every element matched by `locator`, in document order.
    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>, ApiError>;

    /// Number of elements matched by `locator`.
    async fn count(&self, locator: &Locator) -> Result<usize, ApiError>;

    /// Whether at least one element matched by `locator` is visible.
    async fn is_visible(&self, locator: &Locator) -> Result<bool, ApiError>;

    /// Takes a screenshot and returns the encoded image bytes.
    async fn screenshot(&self, options: ScreenshotOptions) -> Result<Vec<u8>, ApiError>;

    /// Snapshot of the page's cookies and local storage.
    async fn storage_state(&self) -> Result<StorageState, ApiError>;

    /// Closes this page.
    async fn close(&self) -> Result<(), ApiError>;

    /// Returns the unique identifier for this page within the browser session.
    fn id(&self) -> String;
}
