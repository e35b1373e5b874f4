//! Live page sessions driven over CDP with chromiumoxide.

use super::{BrowserSession, SessionLauncher};
use crate::config::{ScrapeSettings, USER_AGENT};
use crate::error::{Result, StatsError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::page::Page;
use chromiumoxide::Handler;
use futures::StreamExt;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

const SELECTOR_POLL: Duration = Duration::from_millis(250);
const EXIT_WAIT: Duration = Duration::from_secs(10);

pub struct ChromeLauncher {
    settings: ScrapeSettings,
}

impl ChromeLauncher {
    pub fn new(settings: ScrapeSettings) -> Self {
        Self { settings }
    }

    fn builder(&self) -> chromiumoxide::browser::BrowserConfigBuilder {
        let builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .window_size(1920, 1080);

        if self.settings.headless {
            builder
        } else {
            builder.with_head()
        }
    }

    /// Tries each configured channel in order, then the auto-detected default.
    async fn start_browser(&self) -> Result<(Browser, Handler)> {
        for channel in &self.settings.channels {
            let config = match self.builder().chrome_executable(channel.executable).build() {
                Ok(config) => config,
                Err(e) => {
                    debug!("Skipping {} channel: {}", channel.name, e);
                    continue;
                }
            };

            match Browser::launch(config).await {
                Ok(launched) => {
                    debug!("Launched {} channel", channel.name);
                    return Ok(launched);
                }
                Err(e) => debug!("Could not launch {} channel: {}", channel.name, e),
            }
        }

        let config = self.builder().build().map_err(StatsError::Launch)?;
        let launched = Browser::launch(config).await?;
        debug!("Launched default chromium");
        Ok(launched)
    }

    async fn open_page(&self, browser: &Browser, url: &str) -> Result<Page> {
        let page = browser.new_page("about:blank").await?;

        page.execute(SetUserAgentOverrideParams::new(USER_AGENT))
            .await?;
        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            serde_json::json!({
                "Accept-Language": "en-US,en;q=0.9",
                "Accept-Encoding": "gzip, deflate, br",
            }),
        )))
        .await?;

        let limit = self.settings.navigation_timeout;
        timeout(limit, page.goto(url))
            .await
            .map_err(|_| StatsError::Timeout(format!("navigating to {url} took over {limit:?}")))??;
        timeout(limit, page.wait_for_navigation())
            .await
            .map_err(|_| StatsError::Timeout(format!("{url} did not finish loading in {limit:?}")))??;

        sleep(self.settings.settle_delay).await;
        Ok(page)
    }
}

impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self, url: &str) -> Result<ChromeSession> {
        let (browser, mut handler) = self.start_browser().await?;

        // The handler must be polled for the browser to make progress
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        match self.open_page(&browser, url).await {
            Ok(page) => {
                info!("Loaded {}", url);
                Ok(ChromeSession {
                    browser,
                    handle,
                    page,
                })
            }
            Err(e) => {
                shutdown(browser, handle).await;
                Err(e)
            }
        }
    }
}

pub struct ChromeSession {
    browser: Browser,
    handle: JoinHandle<()>,
    page: Page,
}

impl BrowserSession for ChromeSession {
    async fn query_texts(&self, selector: &str, wait: Duration) -> Result<Vec<String>> {
        let deadline = Instant::now() + wait;

        let elements = loop {
            match self.page.find_elements(selector).await {
                Ok(found) if !found.is_empty() => break found,
                Ok(_) if Instant::now() >= deadline => {
                    return Err(StatsError::Timeout(format!(
                        "no elements matched `{selector}` within {wait:?}"
                    )))
                }
                Err(e) if Instant::now() >= deadline => return Err(e.into()),
                _ => sleep(SELECTOR_POLL).await,
            }
        };

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.inner_text().await?.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn close(self) {
        let ChromeSession {
            browser,
            handle,
            page,
        } = self;
        if let Err(e) = page.close().await {
            debug!("Page close failed: {}", e);
        }
        shutdown(browser, handle).await;
    }
}

/// Closes the browser and reaps its process before the handler task goes
/// away. Returns the exit status when there was a child to wait for.
async fn shutdown(mut browser: Browser, handle: JoinHandle<()>) -> Option<ExitStatus> {
    if let Err(e) = browser.close().await {
        warn!("Browser close failed: {}", e);
        if let Some(Err(e)) = browser.kill().await {
            debug!("Browser kill failed: {}", e);
        }
    }

    let status = match timeout(EXIT_WAIT, browser.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            debug!("Waiting for browser exit failed: {}", e);
            None
        }
        Err(_) => {
            debug!("Browser did not exit within {:?}", EXIT_WAIT);
            None
        }
    };

    handle.abort();
    status
}
