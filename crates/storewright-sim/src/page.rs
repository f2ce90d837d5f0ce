use crate::app::Storefront;
use async_trait::async_trait;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use storewright_interfaces::{
    ApiError, Locator, Page, ScreenshotOptions, StorageState, WaitState,
};
use tokio::time::{Instant, sleep};
use url::Url;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct PageState {
    app: Storefront,
    closed: bool,
}

/// One simulated tab with its own isolated storefront state.
#[derive(Debug, Clone)]
pub struct SimPage {
    id: String,
    state: Arc<Mutex<PageState>>,
}

impl SimPage {
    pub(crate) fn new(id: String, app: Storefront) -> Self {
        Self {
            id,
            state: Arc::new(Mutex::new(PageState { app, closed: false })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, PageState>, ApiError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| ApiError::InternalError("simulated page state poisoned".to_string()))?;
        if guard.closed {
            return Err(ApiError::TargetDetached);
        }
        Ok(guard)
    }

    /// Resolves `locator` to exactly one element.
    fn single(state: &PageState, locator: &Locator) -> Result<usize, ApiError> {
        let matches = state.app.dom().resolve(locator)?;
        match matches.as_slice() {
            [index] => Ok(*index),
            [] => Err(ApiError::ElementNotFound(locator.to_string())),
            _ => Err(ApiError::StrictModeViolation {
                locator: locator.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Like [`SimPage::single`], but the element must also be visible.
    fn actionable(state: &PageState, locator: &Locator, operation: &str) -> Result<usize, ApiError> {
        let index = Self::single(state, locator)?;
        if !state.app.dom().is_visible(index) {
            return Err(ApiError::UnsupportedElement {
                locator: locator.to_string(),
                operation: format!("{} (element is hidden)", operation),
            });
        }
        Ok(index)
    }

    fn reached(state: &PageState, locator: &Locator, wanted: WaitState) -> Result<bool, ApiError> {
        let dom = state.app.dom();
        let matches = dom.resolve(locator)?;
        let any_visible = matches.iter().any(|&i| dom.is_visible(i));
        Ok(match wanted {
            WaitState::Attached => !matches.is_empty(),
            WaitState::Detached => matches.is_empty(),
            WaitState::Visible => any_visible,
            WaitState::Hidden => !any_visible,
        })
    }

    pub(crate) fn close_now(&self) {
        if let Ok(mut guard) = self.state.lock() {
            guard.closed = true;
        }
    }
}

#[async_trait]
impl Page for SimPage {
    async fn navigate(&self, url: &str) -> Result<(), ApiError> {
        let parsed = Url::parse(url)
            .map_err(|e| ApiError::NavigationError(format!("{}: {}", url, e)))?;
        let origin = parsed.origin().ascii_serialization();
        debug!("[{}] navigate {}", self.id, url);
        self.lock()?.app.navigate(origin, parsed.path());
        Ok(())
    }

    async fn url(&self) -> Result<String, ApiError> {
        Ok(self.lock()?.app.url())
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        state: WaitState,
        timeout: Duration,
    ) -> Result<(), ApiError> {
        let deadline = Instant::now() + timeout;
        loop {
            let done = {
                let guard = self.lock()?;
                Self::reached(&guard, locator, state)?
            };
            if done {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ApiError::timeout(
                    format!("{} to be {:?}", locator, state),
                    timeout,
                ));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: &Locator) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        let index = Self::actionable(&guard, locator, "click")?;
        if let Some(action) = guard.app.dom().node(index).action {
            guard.app.dispatch(action);
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        let index = Self::actionable(&guard, locator, "fill")?;
        let field = guard.app.dom().node(index).field.ok_or_else(|| ApiError::UnsupportedElement {
            locator: locator.to_string(),
            operation: "fill".to_string(),
        })?;
        guard.app.fill(field, text);
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        let index = Self::actionable(&guard, locator, "select_option")?;
        if guard.app.dom().node(index).tag != "select" {
            return Err(ApiError::UnsupportedElement {
                locator: locator.to_string(),
                operation: "select_option".to_string(),
            });
        }
        if !guard.app.select_sort(value) {
            return Err(ApiError::InvalidParameters(format!(
                "no option with value {:?} in {}",
                value, locator
            )));
        }
        Ok(())
    }

    async fn text_content(&self, locator: &Locator) -> Result<Option<String>, ApiError> {
        let guard = self.lock()?;
        match Self::single(&guard, locator) {
            Ok(index) => Ok(Some(guard.app.dom().text_content(index))),
            Err(ApiError::ElementNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>, ApiError> {
        let guard = self.lock()?;
        let dom = guard.app.dom();
        Ok(dom
            .resolve(locator)?
            .into_iter()
            .map(|index| dom.text_content(index))
            .collect())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, ApiError> {
        Ok(self.lock()?.app.dom().resolve(locator)?.len())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, ApiError> {
        Self::reached(&*self.lock()?, locator, WaitState::Visible)
    }

    /// A text rendering of the visible page; the simulation has no pixels.
    async fn screenshot(&self, _options: ScreenshotOptions) -> Result<Vec<u8>, ApiError> {
        let guard = self.lock()?;
        let mut dump = format!("{}\n", guard.app.url());
        dump.push_str(&guard.app.dom().render_text());
        Ok(dump.into_bytes())
    }

    async fn storage_state(&self) -> Result<StorageState, ApiError> {
        Ok(StorageState::new(self.lock()?.app.storage_state()))
    }

    async fn close(&self) -> Result<(), ApiError> {
        self.lock()?.closed = true;
        debug!("[{}] closed", self.id);
        Ok(())
    }

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::SimBrowser;
    use storewright_interfaces::Browser;

    async fn login_page() -> Box<dyn Page> {
        let page = SimBrowser::new().new_page(None).await.unwrap();
        page.navigate("https://www.saucedemo.com/").await.unwrap();
        page
    }

    #[tokio::test]
    async fn single_element_operations_are_strict() {
        let page = login_page().await;
        let inputs = Locator::css("input");
        assert_eq!(page.count(&inputs).await.unwrap(), 3);
        assert!(matches!(
            page.text_content(&inputs).await,
            Err(ApiError::StrictModeViolation { count: 3, .. })
        ));
        assert_eq!(page.text_content(&Locator::css(".missing")).await.unwrap(), None);
        assert!(matches!(
            page.click(&Locator::css(".missing")).await,
            Err(ApiError::ElementNotFound(_))
        ));
        assert!(matches!(
            page.fill(&Locator::css("#login-button"), "x").await,
            Err(ApiError::UnsupportedElement { .. })
        ));
    }

    #[tokio::test]
    async fn waits_time_out_with_the_locator_in_the_message() {
        let page = login_page().await;
        let err = page
            .wait_for(
                &Locator::css(".inventory_list"),
                WaitState::Visible,
                Duration::from_millis(30),
            )
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains(".inventory_list"));

        page.wait_for(&Locator::css("[data-test=\"error\"]"), WaitState::Detached, Duration::from_millis(30))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn hidden_menu_links_cannot_be_clicked() {
        let page = login_page().await;
        page.fill(&Locator::css("#user-name"), "standard_user").await.unwrap();
        page.fill(&Locator::css("#password"), "secret_sauce").await.unwrap();
        page.click(&Locator::css("#login-button")).await.unwrap();
        assert!(page.url().await.unwrap().ends_with("/inventory.html"));

        let logout = Locator::css("#logout_sidebar_link");
        assert!(!page.is_visible(&logout).await.unwrap());
        assert!(page.click(&logout).await.is_err());
        page.click(&Locator::css("#react-burger-menu-btn")).await.unwrap();
        page.click(&logout).await.unwrap();
        assert_eq!(page.url().await.unwrap(), "https://www.saucedemo.com/");
    }

    #[tokio::test]
    async fn closed_pages_are_detached() {
        let browser = SimBrowser::new();
        let page = browser.new_page(None).await.unwrap();
        browser.close().await.unwrap();
        assert!(browser.is_closed());
        assert_eq!(page.url().await, Err(ApiError::TargetDetached));
        assert!(browser.new_page(None).await.is_err());
    }
}
