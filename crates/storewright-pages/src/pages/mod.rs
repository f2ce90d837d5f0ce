//! One page object per storefront screen.

mod cart;
mod checkout;
mod inventory;
mod login;

pub use cart::CartPage;
pub use checkout::{CheckoutPage, ContinueOutcome, ShippingField, ShippingInfo, ValidationError};
pub use inventory::{CartMutation, InventoryPage};
pub use login::LoginPage;

use crate::base::PageContext;
use crate::error::PageError;
use crate::screen::ERROR_BANNER;
use storewright_interfaces::{Locator, WaitState};

const TITLE: &str = ".title";
const ERROR_DISMISS: &str = ".error-button";

/// Checks that the screen header contains `expected`.
async fn verify_title(ctx: &PageContext, expected: &str) -> Result<(), PageError> {
    let title = Locator::css(TITLE);
    ctx.wait_visible(&title).await?;
    let text = ctx.page().text_content(&title).await?.unwrap_or_default();
    if !text.contains(expected) {
        return Err(PageError::Verification(format!(
            "title {:?} does not contain {:?}",
            text.trim(),
            expected
        )));
    }
    Ok(())
}

/// Text of the visible form error banner, or an empty string.
async fn error_message(ctx: &PageContext) -> Result<String, PageError> {
    let banner = Locator::css(ERROR_BANNER);
    if !ctx.page().is_visible(&banner).await? {
        return Ok(String::new());
    }
    Ok(ctx
        .page()
        .text_content(&banner)
        .await?
        .map(|text| text.trim().to_string())
        .unwrap_or_default())
}

/// Closes a banner left over from a previous submission so the next settle
/// wait can only be satisfied by a fresh outcome.
async fn dismiss_stale_error(ctx: &PageContext) -> Result<(), PageError> {
    let banner = Locator::css(ERROR_BANNER);
    if !ctx.page().is_visible(&banner).await? {
        return Ok(());
    }
    log::debug!("Dismissing stale error banner");
    ctx.page().click(&Locator::css(ERROR_DISMISS)).await?;
    ctx.wait_for(&banner, WaitState::Hidden).await
}
