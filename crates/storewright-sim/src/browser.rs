use crate::app::Storefront;
use crate::catalog::{Product, catalog};
use crate::page::SimPage;
use async_trait::async_trait;
use log::info;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storewright_interfaces::{ApiError, Browser, Page, StorageState};

#[derive(Debug)]
struct Inner {
    catalog: Arc<Vec<Product>>,
    next_page: AtomicUsize,
    closed: AtomicBool,
    pages: Mutex<Vec<SimPage>>,
}

/// A simulated browser. Every page gets its own isolated context, like a
/// fresh incognito window, optionally seeded with a storage snapshot.
///
/// Clones share the same browser.
#[derive(Debug, Clone)]
pub struct SimBrowser {
    inner: Arc<Inner>,
}

impl Default for SimBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBrowser {
    pub fn new() -> Self {
        Self::with_catalog(catalog())
    }

    pub fn with_catalog(products: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(Inner {
                catalog: Arc::new(products),
                next_page: AtomicUsize::new(0),
                closed: AtomicBool::new(false),
                pages: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Number of pages opened so far, closed ones included.
    pub fn pages_opened(&self) -> usize {
        self.inner.next_page.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for SimBrowser {
    async fn new_page(&self, state: Option<&StorageState>) -> Result<Box<dyn Page>, ApiError> {
        if self.is_closed() {
            return Err(ApiError::BrowserCrashed);
        }
        let number = self.inner.next_page.fetch_add(1, Ordering::SeqCst);
        let mut app = Storefront::new(Arc::clone(&self.inner.catalog));
        if let Some(state) = state {
            app.restore(state.as_value());
        }
        let page = SimPage::new(format!("sim-page-{}", number), app);
        self.inner
            .pages
            .lock()
            .map_err(|_| ApiError::InternalError("simulated browser state poisoned".to_string()))?
            .push(page.clone());
        Ok(Box::new(page))
    }

    async fn close(&self) -> Result<(), ApiError> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let pages = self
            .inner
            .pages
            .lock()
            .map_err(|_| ApiError::InternalError("simulated browser state poisoned".to_string()))?;
        for page in pages.iter() {
            page.close_now();
        }
        info!("Simulated browser closed after {} page(s)", pages.len());
        Ok(())
    }

    async fn version(&self) -> Result<String, ApiError> {
        Ok(format!("storewright-sim/{}", env!("CARGO_PKG_VERSION")))
    }
}
