use super::{dismiss_stale_error, error_message, verify_title};
use crate::base::{PageContext, PageObject};
use crate::error::PageError;
use crate::money::{ITEM_TOTAL_LABEL, OrderSummary, TAX_LABEL, TOTAL_LABEL, parse_labeled_amount};
use crate::screen::{Screen, Transition};
use serde::{Deserialize, Serialize};
use std::fmt;
use storewright_interfaces::Locator;

const FIRST_NAME: &str = "#first-name";
const LAST_NAME: &str = "#last-name";
const POSTAL_CODE: &str = "#postal-code";
const CONTINUE_BUTTON: &str = "#continue";
const CANCEL_BUTTON: &str = "#cancel";
const FINISH_BUTTON: &str = "#finish";
const BACK_TO_PRODUCTS: &str = "#back-to-products";
const SUMMARY_INFO: &str = ".summary_info";
const SUBTOTAL_LABEL: &str = ".summary_subtotal_label";
const TAX_AMOUNT_LABEL: &str = ".summary_tax_label";
const TOTAL_AMOUNT_LABEL: &str = ".summary_total_label";
const OVERVIEW_ITEM_NAME: &str = ".cart_item .inventory_item_name";
const COMPLETE_HEADER: &str = ".complete-header";
const COMPLETE_TEXT: &str = ".complete-text";

/// The three required fields of checkout step one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShippingField {
    FirstName,
    LastName,
    PostalCode,
}

impl ShippingField {
    /// Fields in form order; validation reports the first empty one.
    pub const ORDER: [ShippingField; 3] = [
        ShippingField::FirstName,
        ShippingField::LastName,
        ShippingField::PostalCode,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShippingField::FirstName => "First Name",
            ShippingField::LastName => "Last Name",
            ShippingField::PostalCode => "Postal Code",
        }
    }

    /// Message the form shows when this field is the first empty one.
    pub fn required_message(self) -> String {
        format!("{} is required", self.label())
    }

    /// Recognises a rendered validation message.
    pub fn from_message(message: &str) -> Option<ShippingField> {
        Self::ORDER
            .into_iter()
            .find(|field| message.contains(&field.required_message()))
    }
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

impl ShippingInfo {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            postal_code: postal_code.into(),
        }
    }

    pub fn value(&self, field: ShippingField) -> &str {
        match field {
            ShippingField::FirstName => &self.first_name,
            ShippingField::LastName => &self.last_name,
            ShippingField::PostalCode => &self.postal_code,
        }
    }

    /// The field the form will complain about, if any.
    pub fn first_missing_field(&self) -> Option<ShippingField> {
        ShippingField::ORDER
            .into_iter()
            .find(|field| self.value(*field).is_empty())
    }
}

/// A rejected step-one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field named by the message, when it names one.
    pub field: Option<ShippingField>,
    pub message: String,
}

/// Result of submitting checkout step one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinueOutcome {
    /// The stepper advanced to the overview.
    Overview,
    /// The form stayed on step one and shows an error.
    Rejected(ValidationError),
}

/// Drives the three checkout screens.
///
/// The stepper only moves forward (`CheckoutInfo -> CheckoutOverview ->
/// CheckoutComplete`); `cancel_checkout` leaves it from either of the first two
/// screens and `back_to_products` is the only way out of the last one.
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    ctx: PageContext,
}

impl CheckoutPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub async fn fill_shipping_information(&self, info: &ShippingInfo) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("fill_shipping_information", async {
            ctx.wait_for_screen(Screen::CheckoutInfo).await?;
            for (selector, field) in [FIRST_NAME, LAST_NAME, POSTAL_CODE]
                .into_iter()
                .zip(ShippingField::ORDER)
            {
                ctx.page()
                    .fill(&Locator::css(selector), info.value(field))
                    .await?;
            }
            Ok(())
        })
        .await
    }

    /// Submits step one. A rejection is an outcome, not an error.
    pub async fn continue_to_overview(&self) -> Result<ContinueOutcome, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("continue_to_overview", async {
            ctx.wait_for_screen(Screen::CheckoutInfo).await?;
            dismiss_stale_error(ctx).await?;
            let landed = ctx
                .perform(Transition::ContinueToOverview, &Locator::css(CONTINUE_BUTTON))
                .await?;
            if landed == Screen::CheckoutOverview {
                return Ok(ContinueOutcome::Overview);
            }
            let message = error_message(ctx).await?;
            Ok(ContinueOutcome::Rejected(ValidationError {
                field: ShippingField::from_message(&message),
                message,
            }))
        })
        .await
    }

    /// Places the order. Irreversible: the cart is emptied.
    pub async fn finish_checkout(&self) -> Result<Screen, PageError> {
        let ctx = &self.ctx;
        ctx.guarded(
            "finish_checkout",
            ctx.perform(Transition::Finish, &Locator::css(FINISH_BUTTON)),
        )
        .await
    }

    pub async fn back_to_products(&self) -> Result<Screen, PageError> {
        let ctx = &self.ctx;
        ctx.guarded(
            "back_to_products",
            ctx.perform(Transition::BackToProducts, &Locator::css(BACK_TO_PRODUCTS)),
        )
        .await
    }

    pub async fn cancel_checkout(&self) -> Result<Screen, PageError> {
        let ctx = &self.ctx;
        ctx.guarded(
            "cancel_checkout",
            ctx.perform(Transition::Cancel, &Locator::css(CANCEL_BUTTON)),
        )
        .await
    }

    /// Visible step-one error, or an empty string.
    pub async fn get_error_message(&self) -> Result<String, PageError> {
        error_message(&self.ctx).await
    }

    /// Raw total label of the overview, e.g. `"Total: $32.39"`.
    pub async fn get_total_amount(&self) -> Result<String, PageError> {
        self.overview_label(TOTAL_AMOUNT_LABEL).await
    }

    /// Item total, tax and total parsed from the overview labels.
    pub async fn get_order_summary(&self) -> Result<OrderSummary, PageError> {
        let ctx = &self.ctx;
        ctx.guarded("get_order_summary", async {
            let subtotal = self.overview_label(SUBTOTAL_LABEL).await?;
            let tax = self.overview_label(TAX_AMOUNT_LABEL).await?;
            let total = self.overview_label(TOTAL_AMOUNT_LABEL).await?;
            Ok(OrderSummary {
                item_total: parse_labeled_amount(&subtotal, ITEM_TOTAL_LABEL)?,
                tax: parse_labeled_amount(&tax, TAX_LABEL)?,
                total: parse_labeled_amount(&total, TOTAL_LABEL)?,
            })
        })
        .await
    }

    async fn overview_label(&self, selector: &str) -> Result<String, PageError> {
        self.ctx.wait_for_screen(Screen::CheckoutOverview).await?;
        Ok(self
            .ctx
            .page()
            .text_content(&Locator::css(selector))
            .await?
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }

    /// Products listed on the overview, top to bottom.
    pub async fn get_overview_item_names(&self) -> Result<Vec<String>, PageError> {
        self.ctx.wait_for_screen(Screen::CheckoutOverview).await?;
        let names = self
            .ctx
            .page()
            .all_text_contents(&Locator::css(OVERVIEW_ITEM_NAME))
            .await?;
        Ok(names.into_iter().map(|n| n.trim().to_string()).collect())
    }

    pub async fn get_complete_header(&self) -> Result<String, PageError> {
        self.ctx.wait_for_screen(Screen::CheckoutComplete).await?;
        Ok(self
            .ctx
            .page()
            .text_content(&Locator::css(COMPLETE_HEADER))
            .await?
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }

    pub async fn verify_checkout_step_one(&self) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("verify_checkout_step_one", async {
            verify_title(ctx, "Checkout: Your Information").await?;
            for selector in [FIRST_NAME, LAST_NAME, POSTAL_CODE] {
                ctx.wait_visible(&Locator::css(selector)).await?;
            }
            Ok(())
        })
        .await
    }

    pub async fn verify_checkout_overview(&self) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("verify_checkout_overview", async {
            verify_title(ctx, "Checkout: Overview").await?;
            ctx.wait_visible(&Locator::css(FINISH_BUTTON)).await?;
            ctx.wait_visible(&Locator::css(SUMMARY_INFO)).await
        })
        .await
    }

    pub async fn verify_order_complete(&self) -> Result<(), PageError> {
        let ctx = &self.ctx;
        ctx.guarded("verify_order_complete", async {
            let header = self.get_complete_header().await?;
            if !header.contains("Thank you for your order!") {
                return Err(PageError::Verification(format!(
                    "unexpected confirmation header {:?}",
                    header
                )));
            }
            ctx.wait_visible(&Locator::css(COMPLETE_TEXT)).await?;
            ctx.wait_visible(&Locator::css(BACK_TO_PRODUCTS)).await
        })
        .await
    }
}

impl PageObject for CheckoutPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }

    /// Step one; the later steps are reached through the stepper.
    fn home_screen(&self) -> Screen {
        Screen::CheckoutInfo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::badge_count;
    use crate::money::is_total_label;
    use crate::pages::{CartPage, InventoryPage};
    use crate::test_support::{logged_in, sim_context};
    use rust_decimal::Decimal;

    const BACKPACK: &str = "Sauce Labs Backpack";

    async fn at_step_one(ctx: &PageContext, items: &[&str]) -> CheckoutPage {
        logged_in(ctx).await;
        let inventory = InventoryPage::new(ctx.clone());
        for item in items {
            inventory.add_item_to_cart(item).await.unwrap();
        }
        inventory.go_to_cart().await.unwrap();
        let landed = CartPage::new(ctx.clone()).proceed_to_checkout().await.unwrap();
        assert_eq!(landed, Screen::CheckoutInfo);
        CheckoutPage::new(ctx.clone())
    }

    #[test]
    fn first_empty_field_wins() {
        let cases = [
            (ShippingInfo::new("", "", ""), Some(ShippingField::FirstName)),
            (ShippingInfo::new("", "Doe", "12345"), Some(ShippingField::FirstName)),
            (ShippingInfo::new("John", "", ""), Some(ShippingField::LastName)),
            (ShippingInfo::new("John", "Doe", ""), Some(ShippingField::PostalCode)),
            (ShippingInfo::new("John", "Doe", "12345"), None),
        ];
        for (info, expected) in cases {
            assert_eq!(info.first_missing_field(), expected, "{:?}", info);
        }
        assert_eq!(
            ShippingField::from_message("Error: Last Name is required"),
            Some(ShippingField::LastName)
        );
        assert_eq!(ShippingField::from_message("Epic sadface"), None);
    }

    #[tokio::test]
    async fn missing_fields_keep_the_stepper_on_step_one() {
        let (_browser, ctx, _dir) = sim_context().await;
        let checkout = at_step_one(&ctx, &[BACKPACK]).await;
        checkout.verify_checkout_step_one().await.unwrap();

        let cases = [
            ShippingInfo::new("", "Doe", "12345"),
            ShippingInfo::new("John", "", "12345"),
            ShippingInfo::new("John", "Doe", ""),
        ];
        for info in cases {
            let expected = info.first_missing_field().unwrap();
            checkout.fill_shipping_information(&info).await.unwrap();
            match checkout.continue_to_overview().await.unwrap() {
                ContinueOutcome::Rejected(err) => {
                    assert_eq!(err.field, Some(expected));
                    assert!(err.message.contains(&expected.required_message()));
                }
                other => panic!("expected a rejection, got {:?}", other),
            }
            assert_eq!(checkout.current_screen().await.unwrap(), Screen::CheckoutInfo);
        }
    }

    #[tokio::test]
    async fn single_item_order_totals_add_up() {
        let (_browser, ctx, _dir) = sim_context().await;
        let checkout = at_step_one(&ctx, &[BACKPACK]).await;

        checkout
            .fill_shipping_information(&ShippingInfo::new("John", "Doe", "12345"))
            .await
            .unwrap();
        assert_eq!(
            checkout.continue_to_overview().await.unwrap(),
            ContinueOutcome::Overview
        );
        checkout.verify_checkout_overview().await.unwrap();
        assert_eq!(
            checkout.get_overview_item_names().await.unwrap(),
            vec![BACKPACK.to_string()]
        );

        let summary = checkout.get_order_summary().await.unwrap();
        let unit_price: Decimal = "29.99".parse().unwrap();
        assert!(summary.matches_items(unit_price));
        assert!(summary.is_internally_consistent());
        assert!(summary.total >= unit_price);
        assert!(is_total_label(&checkout.get_total_amount().await.unwrap()));

        assert_eq!(checkout.finish_checkout().await.unwrap(), Screen::CheckoutComplete);
        checkout.verify_order_complete().await.unwrap();
        let badge = checkout.get_cart_item_count().await.unwrap();
        assert_eq!(badge_count(badge.as_deref()).unwrap(), 0);

        assert_eq!(checkout.back_to_products().await.unwrap(), Screen::Inventory);
        let inventory = InventoryPage::new(ctx.clone());
        assert!(!inventory.is_item_in_cart(BACKPACK).await.unwrap());
    }

    #[tokio::test]
    async fn complete_rejects_everything_but_back_to_products() {
        let (_browser, ctx, _dir) = sim_context().await;
        let checkout = at_step_one(&ctx, &[BACKPACK]).await;
        checkout
            .fill_shipping_information(&ShippingInfo::new("John", "Doe", "12345"))
            .await
            .unwrap();
        checkout.continue_to_overview().await.unwrap();
        checkout.finish_checkout().await.unwrap();

        let err = checkout.cancel_checkout().await.unwrap_err();
        assert_eq!(
            err,
            PageError::IllegalTransition {
                from: Screen::CheckoutComplete,
                transition: Transition::Cancel
            }
        );
        assert!(checkout.finish_checkout().await.is_err());
        assert_eq!(checkout.current_screen().await.unwrap(), Screen::CheckoutComplete);
    }

    #[tokio::test]
    async fn cancel_from_either_step_returns_to_inventory() {
        let (_browser, ctx, _dir) = sim_context().await;
        let checkout = at_step_one(&ctx, &[BACKPACK]).await;
        assert_eq!(checkout.cancel_checkout().await.unwrap(), Screen::Inventory);

        let inventory = InventoryPage::new(ctx.clone());
        assert!(inventory.is_item_in_cart(BACKPACK).await.unwrap());
        inventory.go_to_cart().await.unwrap();
        CartPage::new(ctx.clone()).proceed_to_checkout().await.unwrap();
        checkout
            .fill_shipping_information(&ShippingInfo::new("John", "Doe", "12345"))
            .await
            .unwrap();
        checkout.continue_to_overview().await.unwrap();
        assert_eq!(checkout.cancel_checkout().await.unwrap(), Screen::Inventory);
        assert!(inventory.is_item_in_cart(BACKPACK).await.unwrap());
    }
}
