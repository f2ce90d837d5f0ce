//! # Storewright Chrome Provider
//!
//! Implements the `storewright-interfaces` traits (`Browser`, `Page`) for
//! Google Chrome / Chromium using the Chrome DevTools Protocol via
//! `chromiumoxide`.
//!
//! Each page is owned by a [`actors::ChromePageActor`]; the `Page` handle only
//! sends it messages. Element operations are evaluated in the page as small
//! scripts built by [`script`], so locators are resolved fresh on every call.
//! Every page lives in its own browser context; [`storage`] moves cookies and
//! local storage between a context and a persisted snapshot.
//!
//! Actors require a running actix `System` (e.g. `#[actix_rt::main]`).

pub mod actors;
pub mod browser;
pub mod error;
pub mod page;
pub mod script;
pub mod storage;

pub use browser::ChromeBrowser;
pub use error::ChromeError;
pub use page::ChromePage;
