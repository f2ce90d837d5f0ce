//! Client-side model of the shopping cart.
//!
//! Scenarios build a [`Cart`] from what they *did* (items added, items removed)
//! and compare it with what the pages *show*. Membership is by exact product
//! name and every product appears at most once.

use crate::error::PageError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    pub unit_price: Decimal,
}

/// Ordered set of cart lines, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line. Returns `false` (and changes nothing) if the product is already in the cart.
    pub fn add(&mut self, name: impl Into<String>, unit_price: Decimal) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.lines.push(CartLine { name, unit_price });
        true
    }

    /// Removes the line for `name`. Returns `false` if it was not in the cart.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.name != name);
        self.lines.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lines.iter().any(|line| line.name == name)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn names(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of unit prices; the value the checkout's item total must equal.
    pub fn item_total(&self) -> Decimal {
        self.lines.iter().map(|line| line.unit_price).sum()
    }

    /// Whether `names` holds exactly this cart's products, in any order.
    pub fn same_items_as(&self, names: &[String]) -> bool {
        let shown: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        let expected: BTreeSet<&str> = self.lines.iter().map(|l| l.name.as_str()).collect();
        shown.len() == names.len() && shown == expected
    }

    /// Products missing from `names` and products in `names` that should not be there.
    pub fn diff(&self, names: &[String]) -> (Vec<String>, Vec<String>) {
        let missing = self
            .lines
            .iter()
            .filter(|line| !names.contains(&line.name))
            .map(|line| line.name.clone())
            .collect();
        let unexpected = names
            .iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect();
        (missing, unexpected)
    }
}

/// Normalizes the raw cart badge text into an item count.
///
/// The storefront removes the badge entirely when the cart is empty, so an
/// absent badge (`None`) and an empty one both mean zero.
pub fn badge_count(raw: Option<&str>) -> Result<usize, PageError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(text) => text
            .parse::<usize>()
            .map_err(|_| PageError::InvalidBadge(text.to_string())),
    }
}
