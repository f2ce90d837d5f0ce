//! Scenario setup: one live page, shared by every page object of the scenario.

use crate::bootstrap::PersistedIdentity;
use crate::error::ClientError;
use log::debug;
use std::sync::Arc;
use storewright_interfaces::{Browser, Page};
use storewright_pages::{
    CartPage, CheckoutPage, InventoryPage, LoginPage, PageContext, PageObject, PageSettings, Screen,
};

#[derive(Debug)]
pub struct Scenario {
    page: Arc<dyn Page>,
    ctx: PageContext,
}

/// Opens a fresh page for one scenario.
///
/// With an identity the page starts from its stored session and lands on the
/// inventory; without one it starts on the login screen.
pub async fn open_scenario(
    browser: &dyn Browser,
    settings: PageSettings,
    identity: Option<&PersistedIdentity>,
) -> Result<Scenario, ClientError> {
    let page: Arc<dyn Page> =
        Arc::from(browser.new_page(identity.map(PersistedIdentity::storage_state)).await?);
    let ctx = PageContext::new(Arc::clone(&page), settings);
    let scenario = Scenario { page, ctx };

    match identity {
        Some(identity) => {
            debug!("Scenario {} starts as {}", scenario.page.id(), identity.username());
            scenario.inventory().open().await?;
        }
        None => {
            debug!("Scenario {} starts logged out", scenario.page.id());
            scenario.login().goto().await?;
        }
    }
    Ok(scenario)
}

impl Scenario {
    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub fn login(&self) -> LoginPage {
        LoginPage::new(self.ctx.clone())
    }

    pub fn inventory(&self) -> InventoryPage {
        InventoryPage::new(self.ctx.clone())
    }

    pub fn cart(&self) -> CartPage {
        CartPage::new(self.ctx.clone())
    }

    pub fn checkout(&self) -> CheckoutPage {
        CheckoutPage::new(self.ctx.clone())
    }

    pub async fn current_screen(&self) -> Result<Screen, ClientError> {
        Ok(self.ctx.current_screen().await?)
    }

    /// Closes the scenario's page.
    pub async fn finish(self) -> Result<(), ClientError> {
        debug!("Scenario {} finished", self.page.id());
        Ok(self.page.close().await?)
    }
}
