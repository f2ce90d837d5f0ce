//! # Storewright Interfaces (capability contract)
//!
//! This crate defines the browser capabilities the page objects are built on:
//! protocol-agnostic traits (`Browser`, `Page`), the `Locator` used to address
//! elements, the error type (`ApiError`) and the opaque `StorageState` a
//! provider persists for a pre-authenticated identity.
//!
//! Nothing in here knows about the storefront. Providers (a real Chrome
//! instance, the in-process simulation) implement these traits; the page
//! objects only ever call them.

mod browser;
mod common;
mod error;
mod locator;
mod page;

pub use browser::*;
pub use common::*;
pub use error::*;
pub use locator::*;
pub use page::*;
