//! # Storewright Core
//!
//! Ambient plumbing shared by every other crate: layered configuration
//! (`storewright.toml` + environment), logging initialisation and the core
//! error type.

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::CoreError;
