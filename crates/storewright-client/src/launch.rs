//! Entry points: configuration, logging and the Chrome browser.

use crate::bootstrap::{PersistedIdentity, SessionBootstrapper};
use crate::error::ClientError;
use actix::System;
use log::{debug, info};
use std::path::PathBuf;
use storewright_browser_chrome::ChromeBrowser;
use storewright_core::{Config, load_config, logging};
use storewright_interfaces::ApiError;

/// Loads configuration and initialises logging once for the run.
pub fn init(config_path: Option<PathBuf>) -> Result<Config, ClientError> {
    let config = load_config(config_path)?;
    if let Err(e) = logging::setup_logging(&config.global.log_level) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Launches Chrome as configured.
///
/// Page actors run on the current actix `System`, so this must be called from
/// within one (`#[actix_rt::main]`, `#[actix_rt::test]`).
pub async fn launch(config: &Config) -> Result<ChromeBrowser, ClientError> {
    if System::try_current().is_none() {
        return Err(ApiError::LaunchError(
            "no running actix System; start one with #[actix_rt::main]".to_string(),
        )
        .into());
    }
    let browser = ChromeBrowser::launch(
        &config.browser,
        config.target.base_url.clone(),
        config.global.navigation_timeout,
    )
    .await
    .map_err(ApiError::from)?;
    info!("Chrome launched for {}", config.target.base_url);
    Ok(browser)
}

/// Launches a dedicated browser and establishes the standard user's identity.
pub async fn bootstrap_session(config: &Config) -> Result<PersistedIdentity, ClientError> {
    let browser = launch(config).await?;
    SessionBootstrapper::from_config(config)
        .establish(
            &browser,
            &config.credentials.standard_user,
            &config.credentials.password,
        )
        .await
}
