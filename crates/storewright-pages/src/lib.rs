//! # Storewright Pages
//!
//! Typed façades over each storefront screen plus the state model they enforce.
//!
//! - [`screen`]: the explicit screen state machine (which action leads where).
//! - [`PageContext`]/[`PageObject`]: the shared base every page object is built on.
//! - [`pages`]: `LoginPage`, `InventoryPage`, `CartPage`, `CheckoutPage`.
//! - [`cart`], [`money`], [`sort`]: pure models used to re-derive expected values
//!   from raw extracted data instead of trusting a single rendered label.
//!
//! Page objects return plain domain values (strings, numbers, decimals,
//! booleans, vectors). Capability-layer types never cross this crate's API.

pub mod base;
pub mod cart;
pub mod error;
pub mod money;
pub mod pages;
pub mod screen;
pub mod sort;

#[cfg(test)]
mod test_support;

pub use base::{PageContext, PageObject, PageSettings};
pub use cart::{Cart, CartLine, badge_count};
pub use error::PageError;
pub use money::OrderSummary;
pub use pages::{
    CartMutation, CartPage, CheckoutPage, ContinueOutcome, InventoryPage, LoginPage, ShippingField,
    ShippingInfo, ValidationError,
};
pub use screen::{Screen, Transition};
pub use sort::{SortError, SortMode};

pub use rust_decimal::Decimal;
