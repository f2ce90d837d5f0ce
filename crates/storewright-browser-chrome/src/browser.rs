//! Implementation of `storewright_interfaces::Browser` for Chrome.

use crate::actors::ChromePageActor;
use crate::error::ChromeError;
use crate::page::ChromePage;
use crate::storage;
use actix::Actor;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use futures::StreamExt;
use log::{debug, info, warn};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storewright_core::BrowserConfig;
use storewright_interfaces::{ApiError, Browser, Page, StorageState};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A launched Chrome process.
///
/// Every page gets its own browser context, seeded from the snapshot it was
/// created with, so pages never share cookies or local storage. Contexts are
/// disposed when the browser closes.
pub struct ChromeBrowser {
    browser: Mutex<Option<CdpBrowser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    contexts: Mutex<Vec<BrowserContextId>>,
    start_url: String,
    navigation_timeout: Duration,
    next_page: AtomicUsize,
}

impl ChromeBrowser {
    /// Launches Chrome. Must be called from within a running actix `System`.
    pub async fn launch(
        config: &BrowserConfig,
        start_url: impl Into<String>,
        navigation_timeout: Duration,
    ) -> Result<Self, ChromeError> {
        let mut builder = CdpConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height)
            .args(config.args.iter().map(String::as_str));
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.executable_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(ChromeError::Config)?;

        info!("Launching Chrome (headless: {})", config.headless);
        let (browser, mut handler) = CdpBrowser::launch(cdp_config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    debug!("CDP handler loop ended");
                    break;
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handler)),
            contexts: Mutex::new(Vec::new()),
            start_url: start_url.into(),
            navigation_timeout,
            next_page: AtomicUsize::new(1),
        })
    }

    async fn open_page(&self, state: Option<&StorageState>) -> Result<ChromePage, ApiError> {
        let (context_id, cdp_page) = {
            let guard = self.browser.lock().await;
            let browser = guard.as_ref().ok_or(ApiError::BrowserCrashed)?;
            let context_id = browser
                .create_browser_context(CreateBrowserContextParams::default())
                .await
                .map_err(ChromeError::from)?;
            let target = CreateTargetParams::builder()
                .url("about:blank")
                .browser_context_id(context_id.clone())
                .build()
                .map_err(ChromeError::Config)?;
            let cdp_page = browser.new_page(target).await.map_err(ChromeError::from)?;
            (context_id, cdp_page)
        };
        self.contexts.lock().await.push(context_id);

        if let Some(state) = state {
            let cookies = storage::cookie_params(state, &self.start_url)?;
            if !cookies.is_empty() {
                cdp_page.set_cookies(cookies).await.map_err(ChromeError::from)?;
            }
        }

        let page_id = format!("page-{}", self.next_page.fetch_add(1, Ordering::SeqCst));
        let actor = ChromePageActor::new(page_id.clone(), cdp_page, self.navigation_timeout).start();
        let page = ChromePage::new(actor, page_id);

        page.navigate(&self.start_url).await?;
        if let Some(state) = state {
            page.evaluate(storage::seed_local_storage(state)?).await?;
            page.navigate(&self.start_url).await?;
        }
        debug!("Opened {} (seeded: {})", page.id(), state.is_some());
        Ok(page)
    }
}

impl fmt::Debug for ChromeBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromeBrowser")
            .field("start_url", &self.start_url)
            .field("navigation_timeout", &self.navigation_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn new_page(&self, state: Option<&StorageState>) -> Result<Box<dyn Page>, ApiError> {
        Ok(Box::new(self.open_page(state).await?))
    }

    async fn close(&self) -> Result<(), ApiError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };
        info!("Closing Chrome");
        for context_id in self.contexts.lock().await.drain(..) {
            if let Err(e) = browser.dispose_browser_context(context_id).await {
                debug!("Could not dispose browser context: {}", e);
            }
        }
        let closed = browser.close().await.map(|_| ()).map_err(ChromeError::from);
        if let Err(e) = browser.wait().await {
            warn!("Chrome did not exit cleanly: {}", e);
        }
        if let Some(handler) = self.handler.lock().await.take() {
            handler.abort();
        }
        Ok(closed?)
    }

    async fn version(&self) -> Result<String, ApiError> {
        let guard = self.browser.lock().await;
        let browser = guard.as_ref().ok_or(ApiError::BrowserCrashed)?;
        let version = browser.version().await.map_err(ChromeError::from)?;
        Ok(version.product)
    }
}
