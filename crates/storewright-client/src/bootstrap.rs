//! One pre-authenticated identity per run.
//!
//! The bootstrapper logs in once, snapshots the page's storage and writes it
//! to disk. Scenarios then start from that snapshot instead of logging in.

use crate::error::ClientError;
use log::{info, warn};
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storewright_core::Config;
use storewright_interfaces::{Browser, Page, StorageState};
use storewright_pages::{LoginPage, PageContext, PageObject, PageSettings, Screen};

/// An authenticated identity, read-only once established.
#[derive(Debug, Clone)]
pub struct PersistedIdentity {
    username: String,
    password: SecretString,
    state_path: PathBuf,
    state: StorageState,
}

impl PersistedIdentity {
    /// Reads an identity written by an earlier [`SessionBootstrapper::establish`].
    pub async fn load(
        username: impl Into<String>,
        password: SecretString,
        state_path: impl Into<PathBuf>,
    ) -> Result<Self, ClientError> {
        let state_path = state_path.into();
        let bytes = tokio::fs::read(&state_path)
            .await
            .map_err(|source| ClientError::Io {
                path: state_path.clone(),
                source,
            })?;
        let state: StorageState = serde_json::from_slice(&bytes)?;
        Ok(Self {
            username: username.into(),
            password,
            state_path,
            state,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn storage_state(&self) -> &StorageState {
        &self.state
    }
}

pub struct SessionBootstrapper {
    settings: PageSettings,
    state_path: PathBuf,
}

impl SessionBootstrapper {
    pub fn new(settings: PageSettings, state_path: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            state_path: state_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PageSettings::from_config(config),
            config.artifacts.storage_state_path.clone(),
        )
    }

    /// Logs in as `username` on a fresh page of `browser` and persists the session.
    ///
    /// The browser is closed before returning, whatever the outcome.
    pub async fn establish(
        &self,
        browser: &dyn Browser,
        username: &str,
        password: &SecretString,
    ) -> Result<PersistedIdentity, ClientError> {
        info!("Bootstrapping session for {}", username);
        let result = self.login_and_persist(browser, username, password).await;
        if let Err(e) = browser.close().await {
            warn!("Closing the bootstrap browser failed: {}", e);
        }
        match &result {
            Ok(identity) => info!("Session state saved to {}", identity.state_path.display()),
            Err(e) => warn!("Session bootstrap failed: {}", e),
        }
        result
    }

    async fn login_and_persist(
        &self,
        browser: &dyn Browser,
        username: &str,
        password: &SecretString,
    ) -> Result<PersistedIdentity, ClientError> {
        let failure = |reason: String| ClientError::AuthBootstrapFailure {
            username: username.to_string(),
            reason,
        };

        let page: Arc<dyn Page> = Arc::from(browser.new_page(None).await?);
        let login = LoginPage::new(PageContext::new(page, self.settings.clone()));
        login.goto().await.map_err(|e| failure(e.to_string()))?;

        let landed = login
            .login(username, password.expose_secret())
            .await
            .map_err(|e| failure(e.to_string()))?;
        if landed != Screen::Inventory {
            let message = login.get_error_message().await.unwrap_or_default();
            if let Err(e) = login.capture_diagnostic("bootstrap").await {
                warn!("Could not capture bootstrap diagnostic: {}", e);
            }
            return Err(failure(format!("landed on {:?}: {}", landed, message)));
        }

        let state = login.context().storage_state().await?;
        self.write_state(&state).await?;

        Ok(PersistedIdentity {
            username: username.to_string(),
            password: password.clone(),
            state_path: self.state_path.clone(),
            state,
        })
    }

    async fn write_state(&self, state: &StorageState) -> Result<(), ClientError> {
        let io_error = |source| ClientError::Io {
            path: self.state_path.clone(),
            source,
        };
        if let Some(parent) = self.state_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let json = serde_json::to_vec_pretty(state)?;
        tokio::fs::write(&self.state_path, json)
            .await
            .map_err(io_error)
    }
}
