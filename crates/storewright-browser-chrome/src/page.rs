//! Implementation of `storewright_interfaces::Page` for Chrome.

use crate::actors::{
    ChromePageActor, ClosePage, CurrentUrl, Evaluate, GetCookies, Navigate, Screenshot,
};
use crate::error::ChromeError;
use crate::script::{self, Op};
use crate::storage;
use actix::prelude::*;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use storewright_interfaces::{ApiError, Locator, Page, ScreenshotOptions, StorageState, WaitState};
use tokio::time::{Instant, sleep};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handle to one Chrome page. All work is done by its [`ChromePageActor`].
pub struct ChromePage {
    actor_addr: Addr<ChromePageActor>,
    page_id: String,
}

impl ChromePage {
    pub(crate) fn new(actor_addr: Addr<ChromePageActor>, page_id: String) -> Self {
        Self { actor_addr, page_id }
    }

    pub(crate) async fn evaluate(&self, script: String) -> Result<String, ApiError> {
        Ok(self
            .actor_addr
            .send(Evaluate { script })
            .await
            .map_err(ChromeError::from)??)
    }

    async fn run(&self, locator: &Locator, op: Op) -> Result<Value, ApiError> {
        let expression = script::element_op(locator, &op)?;
        let raw = self.evaluate(expression).await?;
        script::parse_reply(locator, &op, &raw)
    }

    async fn run_as<T: serde::de::DeserializeOwned>(
        &self,
        locator: &Locator,
        op: Op,
    ) -> Result<T, ApiError> {
        let value = self.run(locator, op).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl fmt::Debug for ChromePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromePage")
            .field("page_id", &self.page_id)
            .field("connected", &self.actor_addr.connected())
            .finish()
    }
}

#[async_trait]
impl Page for ChromePage {
    async fn navigate(&self, url: &str) -> Result<(), ApiError> {
        debug!("ChromePage ({})::navigate to {}", self.page_id, url);
        Ok(self
            .actor_addr
            .send(Navigate { url: url.to_string() })
            .await
            .map_err(ChromeError::from)??)
    }

    async fn url(&self) -> Result<String, ApiError> {
        Ok(self
            .actor_addr
            .send(CurrentUrl)
            .await
            .map_err(ChromeError::from)??)
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        state: WaitState,
        timeout: Duration,
    ) -> Result<(), ApiError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.run_as::<bool>(locator, Op::State { state }).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ApiError::timeout(
                    format!("{} to be {:?}", locator, state),
                    timeout,
                ));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: &Locator) -> Result<(), ApiError> {
        debug!("ChromePage ({})::click {}", self.page_id, locator);
        self.run(locator, Op::Click).await.map(|_| ())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), ApiError> {
        self.run(locator, Op::Fill { text: text.to_string() })
            .await
            .map(|_| ())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<(), ApiError> {
        self.run(locator, Op::Select { value: value.to_string() })
            .await
            .map(|_| ())
    }

    async fn text_content(&self, locator: &Locator) -> Result<Option<String>, ApiError> {
        self.run_as(locator, Op::Text).await
    }

    async fn all_text_contents(&self, locator: &Locator) -> Result<Vec<String>, ApiError> {
        self.run_as(locator, Op::Texts).await
    }

    async fn count(&self, locator: &Locator) -> Result<usize, ApiError> {
        self.run_as(locator, Op::Count).await
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, ApiError> {
        self.run_as(locator, Op::Visible).await
    }

    async fn screenshot(&self, options: ScreenshotOptions) -> Result<Vec<u8>, ApiError> {
        Ok(self
            .actor_addr
            .send(Screenshot { options })
            .await
            .map_err(ChromeError::from)??)
    }

    async fn storage_state(&self) -> Result<StorageState, ApiError> {
        let raw = self.evaluate(storage::CAPTURE_LOCAL_STORAGE.to_string()).await?;
        let cookies = self
            .actor_addr
            .send(GetCookies)
            .await
            .map_err(ChromeError::from)??;
        storage::snapshot(&raw, cookies)
    }

    async fn close(&self) -> Result<(), ApiError> {
        debug!("ChromePage ({})::close", self.page_id);
        Ok(self
            .actor_addr
            .send(ClosePage)
            .await
            .map_err(ChromeError::from)??)
    }

    fn id(&self) -> String {
        self.page_id.clone()
    }
}
