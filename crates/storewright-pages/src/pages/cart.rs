use super::verify_title;
use crate::base::{PageContext, PageObject};
use crate::cart::Cart;
use crate::error::PageError;
use crate::money::{item_sum, parse_price};
use crate::screen::{Screen, Transition};
use rust_decimal::Decimal;
use storewright_interfaces::{Locator, WaitState};

const CART_ROW: &str = ".cart_item";
const ITEM_NAME: &str = ".inventory_item_name";
const ITEM_PRICE: &str = ".inventory_item_price";
const REMOVE_BUTTON: &str = "[data-test^=\"remove\"]";
const CHECKOUT_BUTTON: &str = "#checkout";
const CONTINUE_SHOPPING: &str = "#continue-shopping";

#[derive(Debug, Clone)]
pub struct CartPage {
    ctx: PageContext,
}

impl CartPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    /// Names of the rendered cart rows; empty when the cart has no rows.
    pub async fn get_cart_item_names(&self) -> Result<Vec<String>, PageError> {
        self.wait_for_stable().await?;
        if self.get_cart_item_count().await? == 0 {
            return Ok(Vec::new());
        }
        let names = self
            .ctx
            .page()
            .all_text_contents(&Locator::css(CART_ROW).locator(ITEM_NAME))
            .await?;
        Ok(names.into_iter().map(|n| n.trim().to_string()).collect())
    }

    /// Number of rendered cart rows.
    pub async fn get_cart_item_count(&self) -> Result<usize, PageError> {
        self.wait_for_stable().await?;
        Ok(self.ctx.page().count(&Locator::css(CART_ROW)).await?)
    }

    pub async fn is_item_in_cart(&self, name: &str) -> Result<bool, PageError> {
        Ok(self.get_cart_item_names().await?.iter().any(|n| n == name))
    }

    pub async fn is_cart_empty(&self) -> Result<bool, PageError> {
        Ok(self.get_cart_item_count().await? == 0)
    }

    /// Removes the row named exactly `name` and waits for it to disappear.
    pub async fn remove_item(&self, name: &str) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("remove_item", async {
            self.wait_for_stable().await?;
            let row = ctx.resolve_row(CART_ROW, ITEM_NAME, name).await?;
            ctx.page().click(&row.locator(REMOVE_BUTTON)).await?;
            let gone = Locator::css(CART_ROW).locator(ITEM_NAME).text_is(name);
            ctx.wait_for(&gone, WaitState::Detached).await
        })
        .await
    }

    /// Sum of the unit prices displayed on every rendered row.
    pub async fn get_total_price(&self) -> Result<Decimal, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("get_total_price", async {
            self.wait_for_stable().await?;
            if self.get_cart_item_count().await? == 0 {
                return Ok(Decimal::ZERO);
            }
            let prices = ctx
                .page()
                .all_text_contents(&Locator::css(CART_ROW).locator(ITEM_PRICE))
                .await?;
            let prices = prices
                .iter()
                .map(|p| parse_price(p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(item_sum(prices.iter()))
        })
        .await
    }

    /// The rendered rows as a [`Cart`].
    ///
    /// Two rows with the same name fail with [`PageError::AmbiguousLookup`].
    pub async fn get_cart_lines(&self) -> Result<Cart, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("get_cart_lines", async {
            self.wait_for_stable().await?;
            let rows = Locator::css(CART_ROW);
            let count = ctx.page().count(&rows).await?;
            let mut cart = Cart::new();
            for index in 0..count {
                let row = rows.clone().nth(index);
                let name = ctx
                    .page()
                    .text_content(&row.clone().locator(ITEM_NAME))
                    .await?
                    .unwrap_or_default();
                let price = ctx
                    .page()
                    .text_content(&row.locator(ITEM_PRICE))
                    .await?
                    .unwrap_or_default();
                let name = name.trim();
                if !cart.add(name, parse_price(&price)?) {
                    let matches = ctx
                        .page()
                        .all_text_contents(&rows.clone().locator(ITEM_NAME))
                        .await?
                        .iter()
                        .filter(|n| n.trim() == name)
                        .count();
                    return Err(PageError::AmbiguousLookup {
                        name: name.to_string(),
                        matches,
                    });
                }
            }
            Ok(cart)
        })
        .await
    }

    pub async fn proceed_to_checkout(&self) -> Result<Screen, PageError> {
        let ctx = &self.ctx;
        ctx.guarded(
            "proceed_to_checkout",
            ctx.perform(Transition::Checkout, &Locator::css(CHECKOUT_BUTTON)),
        )
        .await
    }

    pub async fn continue_shopping(&self) -> Result<Screen, PageError> {
        let ctx = &self.ctx;
        ctx.guarded(
            "continue_shopping",
            ctx.perform(Transition::ContinueShopping, &Locator::css(CONTINUE_SHOPPING)),
        )
        .await
    }

    pub async fn verify_page_loaded(&self) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("verify_cart_page", async {
            verify_title(ctx, "Your Cart").await?;
            ctx.wait_visible(&Locator::css(CONTINUE_SHOPPING)).await?;
            ctx.wait_visible(&Locator::css(CHECKOUT_BUTTON)).await
        })
        .await
    }
}

impl PageObject for CartPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn home_screen(&self) -> Screen {
        Screen::Cart
    }
}
