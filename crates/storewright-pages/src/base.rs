//! The shared base every page object is built on.

use crate::error::PageError;
use crate::screen::{Screen, Transition};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use storewright_core::{Config, TargetConfig};
use storewright_interfaces::{
    ApiError, Locator, Page, ScreenshotOptions, StorageState, WaitState,
};

const CART_LINK: &str = ".shopping_cart_link";
const CART_BADGE: &str = ".shopping_cart_badge";
const MENU_BUTTON: &str = "#react-burger-menu-btn";
const LOGOUT_LINK: &str = "#logout_sidebar_link";

/// Settings shared by all page objects of one scenario.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub target: TargetConfig,
    /// Upper bound for every element-level wait.
    pub timeout: Duration,
    pub screenshot_dir: PathBuf,
}

impl PageSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target: config.target.clone(),
            timeout: config.global.default_timeout,
            screenshot_dir: config.artifacts.screenshot_dir.clone(),
        }
    }
}

/// A live page plus the settings page objects drive it with.
///
/// Cloning is cheap; every page object of a scenario holds a clone of the same
/// context and therefore acts on the same live page.
#[derive(Debug, Clone)]
pub struct PageContext {
    page: Arc<dyn Page>,
    settings: Arc<PageSettings>,
}

impl PageContext {
    pub fn new(page: Arc<dyn Page>, settings: PageSettings) -> Self {
        Self {
            page,
            settings: Arc::new(settings),
        }
    }

    pub(crate) fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Snapshot of the page's cookies and local storage.
    pub async fn storage_state(&self) -> Result<StorageState, PageError> {
        Ok(self.page.storage_state().await?)
    }

    /// Screen the page currently shows, derived from its URL.
    pub async fn current_screen(&self) -> Result<Screen, PageError> {
        let url = self.page.url().await?;
        Screen::from_url(&url).ok_or(PageError::UnknownScreen(url))
    }

    /// Navigates straight to `screen` and returns where the page actually landed.
    ///
    /// Protected screens redirect to Login when the page holds no session, so
    /// the result is not necessarily `screen`.
    pub async fn open(&self, screen: Screen) -> Result<Screen, PageError> {
        let url = self
            .settings
            .target
            .url_for(screen.path())
            .map_err(|e| PageError::Api(ApiError::InvalidParameters(e.to_string())))?;
        debug!("Opening {:?} at {}", screen, url);
        self.page.navigate(&url).await?;

        let settle = if screen.requires_login() {
            format!("{}, {}", screen.marker(), Screen::Login.marker())
        } else {
            screen.marker().to_string()
        };
        self.wait_visible(&Locator::css(settle)).await?;
        self.current_screen().await
    }

    pub(crate) async fn wait_for(&self, locator: &Locator, state: WaitState) -> Result<(), PageError> {
        self.page
            .wait_for(locator, state, self.settings.timeout)
            .await
            .map_err(PageError::from)
    }

    pub(crate) async fn wait_visible(&self, locator: &Locator) -> Result<(), PageError> {
        self.wait_for(locator, WaitState::Visible).await
    }

    /// Waits for the stability marker of `screen`.
    pub(crate) async fn wait_for_screen(&self, screen: Screen) -> Result<(), PageError> {
        self.wait_visible(&Locator::css(screen.marker())).await
    }

    /// Fails with `IllegalTransition` unless `transition` is legal from the current screen.
    pub(crate) async fn check_legal(
        &self,
        transition: Transition,
    ) -> Result<(Screen, &'static [Screen]), PageError> {
        let from = self.current_screen().await?;
        from.next(transition)
            .map(|outcomes| (from, outcomes))
            .ok_or(PageError::IllegalTransition { from, transition })
    }

    /// Clicks `trigger` to fire `transition` and waits for the page to settle
    /// on one of the transition's outcomes.
    pub(crate) async fn perform(
        &self,
        transition: Transition,
        trigger: &Locator,
    ) -> Result<Screen, PageError> {
        let (from, outcomes) = self.check_legal(transition).await?;
        let settle = transition
            .settle_selector(from)
            .ok_or(PageError::IllegalTransition { from, transition })?;

        self.page.click(trigger).await?;
        self.wait_visible(&Locator::css(settle)).await?;

        let landed = self.current_screen().await?;
        if !outcomes.contains(&landed) {
            return Err(PageError::UnexpectedScreen {
                expected: outcomes.to_vec(),
                actual: landed,
            });
        }
        info!("{:?} -[{:?}]-> {:?}", from, transition, landed);
        Ok(landed)
    }

    /// Resolves the single row among `rows` whose `name_selector` text is exactly `name`.
    pub(crate) async fn resolve_row(
        &self,
        rows: &str,
        name_selector: &str,
        name: &str,
    ) -> Result<Locator, PageError> {
        let all_rows = Locator::css(rows);
        let count = self.page.count(&all_rows).await?;

        let mut matches = Vec::new();
        for index in 0..count {
            let title = all_rows.clone().nth(index).locator(name_selector);
            let text = self.page.text_content(&title).await?;
            if text.as_deref().map(str::trim) == Some(name) {
                matches.push(index);
            }
        }

        match matches.as_slice() {
            [index] => Ok(all_rows.nth(*index)),
            _ => Err(PageError::AmbiguousLookup {
                name: name.to_string(),
                matches: matches.len(),
            }),
        }
    }

    /// Writes a full-page screenshot to `<screenshot_dir>/<name>-<unix millis>.png`.
    pub async fn capture_diagnostic(&self, name: &str) -> Result<PathBuf, PageError> {
        let bytes = self
            .page
            .screenshot(ScreenshotOptions::full_page())
            .await
            .map_err(|e| PageError::Diagnostic(e.to_string()))?;

        let dir = &self.settings.screenshot_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| PageError::Diagnostic(format!("{}: {}", dir.display(), e)))?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let path = dir.join(format!("{}-{}.png", file_stem(name), millis));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PageError::Diagnostic(format!("{}: {}", path.display(), e)))?;

        warn!("Diagnostic snapshot written to {}", path.display());
        Ok(path)
    }

    /// Runs `op`, capturing a diagnostic snapshot labelled `label` if it fails.
    pub(crate) async fn guarded<T, F>(&self, label: &str, op: F) -> Result<T, PageError>
    where
        F: Future<Output = Result<T, PageError>> + Send,
        T: Send,
    {
        let result = op.await;
        let failure = match &result {
            Err(err) if err.wants_diagnostic() => Some(err.to_string()),
            _ => None,
        };
        if let Some(message) = failure {
            warn!("{} failed: {}", label, message);
            if let Err(capture_err) = self.capture_diagnostic(label).await {
                warn!("Could not capture diagnostic for {}: {}", label, capture_err);
            }
        }
        result
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Operations shared by every page object.
///
/// Implementors provide the context and the screen they front; everything else
/// has a default built on [`PageContext`].
#[async_trait]
pub trait PageObject: Send + Sync {
    fn context(&self) -> &PageContext;

    /// The screen this page object fronts.
    fn home_screen(&self) -> Screen;

    /// Navigates directly to the home screen.
    async fn open(&self) -> Result<(), PageError> {
        let ctx = self.context();
        let home = self.home_screen();
        ctx.guarded("open", async {
            let landed = ctx.open(home).await?;
            if landed != home {
                return Err(PageError::UnexpectedScreen {
                    expected: vec![home],
                    actual: landed,
                });
            }
            Ok(())
        })
        .await
    }

    async fn current_screen(&self) -> Result<Screen, PageError> {
        self.context().current_screen().await
    }

    /// Waits until the home screen's stability marker is visible.
    async fn wait_for_stable(&self) -> Result<(), PageError> {
        let ctx = self.context();
        ctx.guarded("wait_for_stable", ctx.wait_for_screen(self.home_screen()))
            .await
    }

    /// Raw cart badge text: `Some("3")` when shown, `None` when the badge is absent.
    async fn get_cart_item_count(&self) -> Result<Option<String>, PageError> {
        let ctx = self.context();
        ctx.guarded("get_cart_item_count", async {
            ctx.wait_visible(&Locator::css(CART_LINK)).await?;
            let badge = Locator::css(CART_BADGE);
            if !ctx.page().is_visible(&badge).await? {
                return Ok(None);
            }
            Ok(ctx
                .page()
                .text_content(&badge)
                .await?
                .map(|text| text.trim().to_string()))
        })
        .await
    }

    async fn go_to_cart(&self) -> Result<Screen, PageError> {
        let ctx = self.context();
        ctx.guarded(
            "go_to_cart",
            ctx.perform(Transition::OpenCart, &Locator::css(CART_LINK)),
        )
        .await
    }

    /// Logs out through the side menu.
    async fn logout(&self) -> Result<Screen, PageError> {
        let ctx = self.context();
        ctx.guarded("logout", async {
            ctx.check_legal(Transition::Logout).await?;
            ctx.page().click(&Locator::css(MENU_BUTTON)).await?;
            let link = Locator::css(LOGOUT_LINK);
            ctx.wait_visible(&link).await?;
            ctx.perform(Transition::Logout, &link).await
        })
        .await
    }

    async fn capture_diagnostic(&self, name: &str) -> Result<PathBuf, PageError> {
        self.context().capture_diagnostic(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_names_are_safe_file_stems() {
        assert_eq!(file_stem("add_item_to_cart"), "add_item_to_cart");
        assert_eq!(file_stem("cart/remove Sauce Labs"), "cart-remove-Sauce-Labs");
    }

    #[test]
    fn settings_follow_configuration() {
        let mut config = Config::default();
        config.global.default_timeout = Duration::from_millis(250);
        config.artifacts.screenshot_dir = PathBuf::from("/tmp/shots");

        let settings = PageSettings::from_config(&config);
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.screenshot_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(settings.target.base_url, "https://www.saucedemo.com");
    }
}
