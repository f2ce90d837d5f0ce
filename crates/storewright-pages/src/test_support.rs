use crate::base::{PageContext, PageSettings};
use crate::pages::LoginPage;
use crate::screen::Screen;
use std::sync::Arc;
use std::time::Duration;
use storewright_core::TargetConfig;
use storewright_interfaces::Browser;
use storewright_sim::{Product, SimBrowser, catalog};
use tempfile::TempDir;

pub(crate) const PASSWORD: &str = "secret_sauce";

/// A fresh simulated page with short waits and a throwaway screenshot directory.
pub(crate) async fn sim_context() -> (SimBrowser, PageContext, TempDir) {
    sim_context_with(catalog()).await
}

pub(crate) async fn sim_context_with(products: Vec<Product>) -> (SimBrowser, PageContext, TempDir) {
    let browser = SimBrowser::with_catalog(products);
    let page = browser.new_page(None).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let settings = PageSettings {
        target: TargetConfig::default(),
        timeout: Duration::from_millis(300),
        screenshot_dir: dir.path().to_path_buf(),
    };
    (browser, PageContext::new(Arc::from(page), settings), dir)
}

pub(crate) async fn logged_in(ctx: &PageContext) {
    let login = LoginPage::new(ctx.clone());
    login.goto().await.unwrap();
    assert_eq!(
        login.login("standard_user", PASSWORD).await.unwrap(),
        Screen::Inventory
    );
}
