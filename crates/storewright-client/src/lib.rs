//! # Storewright Client
//!
//! Ties the layers together for a test run:
//!
//! 1. [`init`] loads configuration and sets up logging.
//! 2. [`bootstrap_session`] (or [`SessionBootstrapper`] with any `Browser`)
//!    logs in once and persists the session as a [`PersistedIdentity`].
//! 3. [`open_scenario`] gives each scenario its own page, pre-authenticated
//!    from that identity, and hands out page objects bound to it.
//!
//! [`Fixtures`] holds the canonical inputs scenarios draw from.

mod bootstrap;
mod error;
pub mod fixtures;
mod launch;
mod scenario;

pub use bootstrap::{PersistedIdentity, SessionBootstrapper};
pub use error::ClientError;
pub use fixtures::{Credentials, Fixtures, InvalidLogin, InvalidShipping};
pub use launch::{bootstrap_session, init, launch};
pub use scenario::{Scenario, open_scenario};

pub use storewright_core::Config;
pub use storewright_interfaces::{ApiError, Browser, Page};
pub use storewright_pages::{
    Cart, CartMutation, CartPage, CheckoutPage, ContinueOutcome, Decimal, InventoryPage, LoginPage,
    OrderSummary, PageContext, PageError, PageObject, PageSettings, Screen, ShippingField, ShippingInfo,
    SortMode, ValidationError, badge_count, sort,
};
