//! # Storewright Sim
//!
//! An in-process stand-in for the demo storefront that implements the
//! `storewright-interfaces` capability contract. It renders the same element
//! structure (ids, classes, `data-test` attributes), error texts and flows as
//! the live application, so page objects and scenarios can be exercised
//! without a browser.
//!
//! Interactions apply synchronously; waits still poll so that timeouts behave
//! as they do against a real page.

mod app;
mod browser;
mod catalog;
mod dom;
mod page;

pub use browser::SimBrowser;
pub use catalog::{LOCKED_OUT_USER, PASSWORD, Product, USERS, catalog};
pub use page::SimPage;
