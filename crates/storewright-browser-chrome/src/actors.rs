//! The page actor: sole owner of one CDP page handle.

use crate::error::ChromeError;
use actix::prelude::*;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;
use storewright_interfaces::{ScreenshotFormat, ScreenshotOptions};

// ================= Messages =================

#[derive(Debug, Message)]
#[rtype(result = "Result<(), ChromeError>")]
pub struct Navigate {
    pub url: String,
}

/// Evaluates `script`, which must produce a string (see [`crate::script`]).
#[derive(Debug, Message)]
#[rtype(result = "Result<String, ChromeError>")]
pub struct Evaluate {
    pub script: String,
}

#[derive(Debug, Message)]
#[rtype(result = "Result<String, ChromeError>")]
pub struct CurrentUrl;

#[derive(Debug, Message)]
#[rtype(result = "Result<Vec<u8>, ChromeError>")]
pub struct Screenshot {
    pub options: ScreenshotOptions,
}

/// All cookies visible to the page, as CDP `Network.Cookie` objects.
#[derive(Debug, Message)]
#[rtype(result = "Result<Vec<Value>, ChromeError>")]
pub struct GetCookies;

#[derive(Debug, Message)]
#[rtype(result = "Result<(), ChromeError>")]
pub struct ClosePage;

// ================= Chrome Page Actor =================

pub struct ChromePageActor {
    page_id: String,
    page: Option<chromiumoxide::Page>,
    navigation_timeout: Duration,
}

impl ChromePageActor {
    pub fn new(page_id: String, page: chromiumoxide::Page, navigation_timeout: Duration) -> Self {
        Self {
            page_id,
            page: Some(page),
            navigation_timeout,
        }
    }

    fn page(&self) -> Result<chromiumoxide::Page, ChromeError> {
        self.page.clone().ok_or(ChromeError::PageClosed)
    }
}

impl Actor for ChromePageActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        debug!("ChromePageActor {} started", self.page_id);
    }

    fn stopped(&mut self, _ctx: &mut Context<Self>) {
        if let Some(page) = self.page.take() {
            warn!("ChromePageActor {} stopped with its page still open", self.page_id);
            actix::spawn(async move {
                let _ = page.close().await;
            });
        }
        debug!("ChromePageActor {} stopped", self.page_id);
    }
}

impl Handler<Navigate> for ChromePageActor {
    type Result = ResponseFuture<Result<(), ChromeError>>;

    fn handle(&mut self, msg: Navigate, _ctx: &mut Context<Self>) -> Self::Result {
        let page = self.page();
        let timeout = self.navigation_timeout;
        let page_id = self.page_id.clone();

        Box::pin(async move {
            let page = page?;
            debug!("ChromePageActor {} navigating to {}", page_id, msg.url);
            match tokio::time::timeout(timeout, page.goto(msg.url.as_str())).await {
                Ok(result) => result.map(|_| ()).map_err(ChromeError::from),
                Err(_) => Err(ChromeError::NavigationTimeout {
                    url: msg.url,
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            }
        })
    }
}

impl Handler<Evaluate> for ChromePageActor {
    type Result = ResponseFuture<Result<String, ChromeError>>;

    fn handle(&mut self, msg: Evaluate, _ctx: &mut Context<Self>) -> Self::Result {
        let page = self.page();

        Box::pin(async move {
            let result = page?.evaluate(msg.script).await?;
            result
                .into_value::<String>()
                .map_err(|e| ChromeError::Payload(e.to_string()))
        })
    }
}

impl Handler<CurrentUrl> for ChromePageActor {
    type Result = ResponseFuture<Result<String, ChromeError>>;

    fn handle(&mut self, _msg: CurrentUrl, _ctx: &mut Context<Self>) -> Self::Result {
        let page = self.page();

        Box::pin(async move {
            Ok(page?.url().await?.unwrap_or_else(|| "about:blank".to_string()))
        })
    }
}

impl Handler<Screenshot> for ChromePageActor {
    type Result = ResponseFuture<Result<Vec<u8>, ChromeError>>;

    fn handle(&mut self, msg: Screenshot, _ctx: &mut Context<Self>) -> Self::Result {
        let page = self.page();
        let format = match msg.options.format {
            ScreenshotFormat::Png => CaptureScreenshotFormat::Png,
            ScreenshotFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
        };

        Box::pin(async move {
            let params = ScreenshotParams::builder()
                .format(format)
                .full_page(msg.options.full_page)
                .build();
            Ok(page?.screenshot(params).await?)
        })
    }
}

impl Handler<GetCookies> for ChromePageActor {
    type Result = ResponseFuture<Result<Vec<Value>, ChromeError>>;

    fn handle(&mut self, _msg: GetCookies, _ctx: &mut Context<Self>) -> Self::Result {
        let page = self.page();

        Box::pin(async move {
            page?
                .get_cookies()
                .await?
                .iter()
                .map(|cookie| serde_json::to_value(cookie).map_err(|e| ChromeError::Payload(e.to_string())))
                .collect()
        })
    }
}

impl Handler<ClosePage> for ChromePageActor {
    type Result = ResponseFuture<Result<(), ChromeError>>;

    fn handle(&mut self, _msg: ClosePage, ctx: &mut Context<Self>) -> Self::Result {
        let page = self.page.take();
        let page_id = self.page_id.clone();
        ctx.stop();

        Box::pin(async move {
            let page = page.ok_or(ChromeError::PageClosed)?;
            page.close().await?;
            info!("Closed page {}", page_id);
            Ok(())
        })
    }
}
