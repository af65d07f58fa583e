//! Headless Chromium renderer using chromiumoxide.

use super::{RenderSession, Renderer};
use crate::config::Settings;
use crate::error::{Result, RevexError};
use crate::types::PageSnapshot;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Find a Chromium binary: explicit path first, then the usual names on PATH.
pub fn find_chromium(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        let path = PathBuf::from(p);
        if path.exists() {
            return Some(path);
        }
    }

    let path_var = std::env::var_os("PATH")?;
    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    pub chrome_path: Option<String>,
    pub user_agent: String,
    pub navigation_timeout: Duration,
    /// Wait after the first navigation before capturing the DOM.
    pub initial_settle: Duration,
    /// Wait after clicking "next" before capturing the DOM.
    pub click_settle: Duration,
}

impl From<&Settings> for ChromiumOptions {
    fn from(s: &Settings) -> Self {
        Self {
            chrome_path: s.chrome_path.clone(),
            user_agent: s.user_agent.clone(),
            navigation_timeout: s.navigation_timeout(),
            initial_settle: s.initial_settle(),
            click_settle: s.click_settle(),
        }
    }
}

/// Launches one headless browser per session.
pub struct ChromiumRenderer {
    opts: ChromiumOptions,
}

impl ChromiumRenderer {
    pub fn new(opts: ChromiumOptions) -> Self {
        Self { opts }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .request_timeout(self.opts.navigation_timeout);

        if let Some(path) = find_chromium(self.opts.chrome_path.as_deref()) {
            builder = builder.chrome_executable(path);
        }

        builder
            .build()
            .map_err(|e| RevexError::Render(format!("failed to build browser config: {e}")))
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn open_session(&self) -> Result<Box<dyn RenderSession>> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| RevexError::Render(format!("failed to launch Chromium: {e}")))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match open_page(&browser, &self.opts.user_agent).await {
            Ok(page) => page,
            Err(e) => {
                // The session never existed, so tear the process down here.
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(e);
            }
        };

        debug!("browser session opened");
        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            opts: self.opts.clone(),
        }))
    }
}

async fn open_page(browser: &Browser, user_agent: &str) -> Result<Page> {
    let page = browser.new_page("about:blank").await?;
    page.set_user_agent(user_agent).await?;
    Ok(page)
}

/// One browser process with a single tab.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    opts: ChromiumOptions,
}

impl ChromiumSession {
    async fn snapshot_after(&self, settle: Duration) -> Result<PageSnapshot> {
        tokio::time::sleep(settle).await;
        let html = self
            .page
            .content()
            .await
            .map_err(|e| RevexError::Render(format!("failed to read page content: {e}")))?;
        Ok(PageSnapshot::new(html))
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> Result<PageSnapshot> {
        let start = Instant::now();
        let timeout = self.opts.navigation_timeout;

        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(RevexError::Render(format!("navigation failed: {e}"))),
            Err(_) => {
                return Err(RevexError::Render(format!(
                    "navigation timed out after {}ms",
                    timeout.as_millis()
                )))
            }
        }
        debug!(url, load_ms = start.elapsed().as_millis() as u64, "navigated");

        self.snapshot_after(self.opts.initial_settle).await
    }

    async fn click_next(&mut self, locator: &str) -> Result<PageSnapshot> {
        let element = self
            .page
            .find_element(locator)
            .await
            .map_err(|e| RevexError::Render(format!("next control '{locator}' not found: {e}")))?;

        let timeout = self.opts.navigation_timeout;
        match tokio::time::timeout(timeout, element.click()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(RevexError::Render(format!("click failed: {e}"))),
            Err(_) => {
                return Err(RevexError::Render(format!(
                    "click timed out after {}ms",
                    timeout.as_millis()
                )))
            }
        }

        self.snapshot_after(self.opts.click_settle).await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            mut browser,
            page,
            handler_task,
            ..
        } = *self;

        if let Err(e) = page.close().await {
            warn!(error = %e, "failed to close page");
        }
        let closed = browser.close().await.map(|_| ());
        let _ = browser.wait().await;
        handler_task.abort();
        debug!("browser session closed");

        closed.map_err(|e| RevexError::Render(format!("failed to close browser: {e}")))
    }
}
