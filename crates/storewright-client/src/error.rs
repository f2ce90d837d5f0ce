//! Errors raised while bootstrapping a session or setting up scenarios.

use std::path::PathBuf;
use storewright_core::CoreError;
use storewright_interfaces::ApiError;
use storewright_pages::PageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Login did not reach the inventory screen; nothing was persisted.
    #[error("Could not establish a session for {username:?}: {reason}")]
    AuthBootstrapFailure { username: String, reason: String },

    #[error("Configuration loading failed: {0}")]
    Config(#[from] CoreError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session artifact is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Page(#[from] PageError),
}
