//! The fixed product catalog and user table the simulated storefront serves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

impl Product {
    pub fn new(name: &str, price: Decimal) -> Self {
        Self {
            name: name.to_string(),
            description: format!("{} description", name),
            price,
        }
    }

    /// Suffix of the row buttons' `id`/`data-test`, e.g. `sauce-labs-backpack`.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }
}

/// The six products of the demo store.
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new("Sauce Labs Backpack", Decimal::new(2999, 2)),
        Product::new("Sauce Labs Bike Light", Decimal::new(999, 2)),
        Product::new("Sauce Labs Bolt T-Shirt", Decimal::new(1599, 2)),
        Product::new("Sauce Labs Fleece Jacket", Decimal::new(4999, 2)),
        Product::new("Sauce Labs Onesie", Decimal::new(799, 2)),
        Product::new("Test.allTheThings() T-Shirt (Red)", Decimal::new(1599, 2)),
    ]
}

pub const PASSWORD: &str = "secret_sauce";
pub const LOCKED_OUT_USER: &str = "locked_out_user";

/// Accounts that can log in with [`PASSWORD`].
pub const USERS: [&str; 5] = [
    "standard_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];
