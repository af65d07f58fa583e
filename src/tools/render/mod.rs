//! Render capability: a browser session that turns URLs and clicks into
//! DOM snapshots.
//!
//! A [`Renderer`] hands out [`RenderSession`]s. Each session owns scarce OS
//! resources (a browser process), so callers must release it with
//! [`RenderSession::close`] on every exit path. `close` consumes the session,
//! so it cannot run twice.

mod chromium;

pub use chromium::{find_chromium, ChromiumOptions, ChromiumRenderer};

use crate::error::Result;
use crate::types::PageSnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Acquire a fresh, exclusive render context.
    async fn open_session(&self) -> Result<Box<dyn RenderSession>>;
}

#[async_trait]
pub trait RenderSession: Send {
    /// Navigate to `url`, let the page settle, and capture the DOM.
    async fn goto(&mut self, url: &str) -> Result<PageSnapshot>;

    /// Click the element matching `locator`, let the page settle, and
    /// capture the DOM again.
    async fn click_next(&mut self, locator: &str) -> Result<PageSnapshot>;

    /// Release the context and everything it holds.
    async fn close(self: Box<Self>) -> Result<()>;
}
