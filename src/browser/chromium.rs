//! Chromium backend built on chromiumoxide

use crate::browser::idle::{
    wait_for_network_quiet, InflightRequests, RequestEvent, MAX_INFLIGHT, QUIET_WINDOW,
};
use crate::browser::{BrowserEngine, BrowserError, BrowserResult, EngineLauncher, PageHandle};
use crate::config::BrowserConfig as BrowserSettings;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const DEFAULT_ARGS: [&str; 5] = [
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--disable-gpu",
    "--no-first-run",
];

/// Launches a local Chrome/Chromium process
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> BrowserResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .args(DEFAULT_ARGS)
            .args(self.settings.extra_args.iter().map(String::as_str));

        if !self.settings.headless {
            builder = builder.with_head();
        }

        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(BrowserError::Launch)
    }
}

#[async_trait]
impl EngineLauncher for ChromiumLauncher {
    async fn launch(&self) -> BrowserResult<Arc<dyn BrowserEngine>> {
        let config = self.browser_config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::error!("Browser event error: {}", e);
                }
            }
            tracing::debug!("Browser event handler finished");
        });

        tracing::info!(headless = self.settings.headless, "Browser launched");

        Ok(Arc::new(ChromiumEngine {
            browser: Mutex::new(Some(browser)),
            handler_task,
        }))
    }
}

/// A running Chromium process
pub struct ChromiumEngine {
    browser: Mutex<Option<Browser>>,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn new_page(&self) -> BrowserResult<Box<dyn PageHandle>> {
        let guard = self.browser.lock().await;
        let browser = guard.as_ref().ok_or(BrowserError::Closed)?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;

        Ok(Box::new(ChromiumPage { page }))
    }

    async fn shutdown(&self) -> BrowserResult<()> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        let closed = browser
            .close()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()));

        if let Err(e) = browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", e);
        }
        self.handler_task.abort();

        closed.map(|_| ())
    }
}

/// A Chromium tab
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// Started, finished and failed network requests of this tab, merged
    async fn request_events(&self) -> BrowserResult<BoxStream<'static, RequestEvent>> {
        let listen_error = |e: chromiumoxide::error::CdpError| BrowserError::Protocol(e.to_string());

        let started = self
            .page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(listen_error)?
            .map(|e| RequestEvent::Started(e.request_id.inner().clone()));
        let finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(listen_error)?
            .map(|e| RequestEvent::Finished(e.request_id.inner().clone()));
        let failed = self
            .page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(listen_error)?
            .map(|e| RequestEvent::Finished(e.request_id.inner().clone()));

        Ok(stream::select_all([started.boxed(), finished.boxed(), failed.boxed()]).boxed())
    }
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn set_user_agent(&self, user_agent: &str) -> BrowserResult<()> {
        self.page
            .set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Protocol(e.to_string()))
    }

    async fn goto(&self, url: &str) -> BrowserResult<()> {
        // subscribe first so requests issued during the load are counted
        let events = self.request_events().await?;

        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        wait_for_network_quiet(InflightRequests::default(), events, MAX_INFLIGHT, QUIET_WINDOW).await;
        Ok(())
    }

    async fn title(&self) -> BrowserResult<String> {
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(title.unwrap_or_default())
    }

    async fn url(&self) -> BrowserResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn content(&self) -> BrowserResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<serde_json::Value> {
        let params = EvaluateParams::builder()
            .expression(script)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(BrowserError::Evaluation)?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        self.page
            .save_screenshot(ScreenshotParams::builder().full_page(false).build(), path)
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Protocol(e.to_string()))
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))
    }
}
