use super::verify_title;
use crate::base::{PageContext, PageObject};
use crate::error::PageError;
use crate::money::parse_price;
use crate::screen::Screen;
use crate::sort::SortMode;
use log::debug;
use rust_decimal::Decimal;
use storewright_interfaces::Locator;

const SORT_DROPDOWN: &str = ".product_sort_container";
const ACTIVE_SORT: &str = ".active_option";
const ITEM_ROW: &str = ".inventory_item";
const ITEM_NAME: &str = ".inventory_item_name";
const ITEM_PRICE: &str = ".inventory_item_price";
const ADD_BUTTON: &str = "[data-test^=\"add-to-cart\"]";
const REMOVE_BUTTON: &str = "[data-test^=\"remove\"]";

/// Whether a cart mutation changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartMutation {
    Applied,
    /// The row was already in the requested state.
    NoOp,
}

#[derive(Debug, Clone)]
pub struct InventoryPage {
    ctx: PageContext,
}

impl InventoryPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    /// Applies `mode` and waits until the dropdown reports it as active.
    pub async fn sort_by(&self, mode: SortMode) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("sort_by", async {
            self.wait_for_stable().await?;
            ctx.page()
                .select_option(&Locator::css(SORT_DROPDOWN), mode.option_value())
                .await?;
            ctx.wait_visible(&Locator::css(ACTIVE_SORT).text_is(mode.label()))
                .await?;
            debug!("Catalog sorted by {}", mode);
            Ok(())
        })
        .await
    }

    /// Adds the product named exactly `name`. Adding a product that is already
    /// in the cart changes nothing.
    pub async fn add_item_to_cart(&self, name: &str) -> Result<CartMutation, PageError> {
        self.toggle(name, ADD_BUTTON, REMOVE_BUTTON, "add_item_to_cart")
            .await
    }

    /// Removes the product named exactly `name` from the cart.
    pub async fn remove_item_from_cart(&self, name: &str) -> Result<CartMutation, PageError> {
        self.toggle(name, REMOVE_BUTTON, ADD_BUTTON, "remove_item_from_cart")
            .await
    }

    /// Clicks `trigger` inside the row for `name`, then waits for the row to
    /// show `result` in its place.
    async fn toggle(
        &self,
        name: &str,
        trigger: &str,
        result: &str,
        label: &str,
    ) -> Result<CartMutation, PageError> {
        let ctx = &self.ctx;
        ctx.guarded(label, async {
            self.wait_for_stable().await?;
            let row = ctx.resolve_row(ITEM_ROW, ITEM_NAME, name).await?;
            let button = row.clone().locator(trigger);
            let toggled = row.locator(result);

            if !ctx.page().is_visible(&button).await? {
                if ctx.page().is_visible(&toggled).await? {
                    debug!("{}: {:?} already in the requested state", label, name);
                    return Ok(CartMutation::NoOp);
                }
                return Err(PageError::Verification(format!(
                    "row {:?} shows neither cart button",
                    name
                )));
            }

            ctx.page().click(&button).await?;
            ctx.wait_visible(&toggled).await?;
            Ok(CartMutation::Applied)
        })
        .await
    }

    /// Displayed product names, top to bottom.
    pub async fn get_item_names(&self) -> Result<Vec<String>, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("get_item_names", async {
            self.wait_for_stable().await?;
            ctx.wait_visible(&Locator::css(ITEM_NAME).first()).await?;
            let names = ctx
                .page()
                .all_text_contents(&Locator::css(ITEM_NAME))
                .await?;
            Ok(names.into_iter().map(|n| n.trim().to_string()).collect())
        })
        .await
    }

    /// Displayed unit prices, top to bottom.
    pub async fn get_item_prices(&self) -> Result<Vec<Decimal>, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("get_item_prices", async {
            self.wait_for_stable().await?;
            ctx.wait_visible(&Locator::css(ITEM_PRICE).first()).await?;
            let texts = ctx
                .page()
                .all_text_contents(&Locator::css(ITEM_PRICE))
                .await?;
            texts.iter().map(|text| parse_price(text)).collect()
        })
        .await
    }

    pub async fn get_item_count(&self) -> Result<usize, PageError> {
        self.wait_for_stable().await?;
        Ok(self.ctx.page().count(&Locator::css(ITEM_ROW)).await?)
    }

    /// Whether the row for `name` currently offers its remove button.
    pub async fn is_item_in_cart(&self, name: &str) -> Result<bool, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("is_item_in_cart", async {
            self.wait_for_stable().await?;
            let row = ctx.resolve_row(ITEM_ROW, ITEM_NAME, name).await?;
            Ok(ctx.page().is_visible(&row.locator(REMOVE_BUTTON)).await?)
        })
        .await
    }

    pub async fn verify_page_loaded(&self) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("verify_inventory_page", async {
            verify_title(ctx, "Products").await?;
            ctx.wait_visible(&Locator::css(SORT_DROPDOWN)).await
        })
        .await
    }
}

impl PageObject for InventoryPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn home_screen(&self) -> Screen {
        Screen::Inventory
    }
}
