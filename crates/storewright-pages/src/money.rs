//! Parsing of rendered amounts (`$29.99`, `Total: $32.39`).

use crate::error::PageError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parses a displayed price such as `"$29.99"` or `" 29.99 "`.
pub fn parse_price(text: &str) -> Result<Decimal, PageError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    digits
        .parse::<Decimal>()
        .map_err(|_| PageError::InvalidPrice(text.to_string()))
}

/// Parses a labelled amount such as `"Tax: $2.40"` given the label `"Tax:"`.
pub fn parse_labeled_amount(text: &str, label: &str) -> Result<Decimal, PageError> {
    text.trim()
        .strip_prefix(label)
        .ok_or_else(|| PageError::InvalidPrice(text.to_string()))
        .and_then(parse_price)
}

/// Sum of `prices`, the reference total every displayed total is checked against.
pub fn item_sum<'a>(prices: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    prices.into_iter().copied().sum()
}

/// Whether a total label has the documented `Total: $<amount>` shape.
pub fn is_total_label(text: &str) -> bool {
    parse_labeled_amount(text, TOTAL_LABEL).is_ok() && text.trim().starts_with("Total: $")
}

pub(crate) const ITEM_TOTAL_LABEL: &str = "Item total:";
pub(crate) const TAX_LABEL: &str = "Tax:";
pub(crate) const TOTAL_LABEL: &str = "Total:";

/// The three amounts shown on the checkout overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub item_total: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// `total == item_total + tax`. Tax itself is whatever the application charged.
    pub fn is_internally_consistent(&self) -> bool {
        self.item_total + self.tax == self.total && self.tax >= Decimal::ZERO
    }

    /// Whether the displayed item total equals an independently summed cart.
    pub fn matches_items(&self, recomputed_item_sum: Decimal) -> bool {
        self.item_total == recomputed_item_sum
    }
}
