//! In-memory render and generation doubles for tests.

use crate::error::{Result, RevexError};
use crate::tools::generate::TextGenerator;
use crate::tools::render::{RenderSession, Renderer};
use crate::types::PageSnapshot;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Generator that always answers with the same scripted reply.
pub struct ScriptedGenerator {
    reply: std::result::Result<String, String>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_output_tokens));
        self.reply
            .clone()
            .map_err(RevexError::CapabilityUnavailable)
    }
}

/// Generator whose call never completes.
pub struct HangingGenerator;

#[async_trait]
impl TextGenerator for HangingGenerator {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn generate(&self, _prompt: &str, _max_output_tokens: usize) -> Result<String> {
        std::future::pending().await
    }
}

/// Renderer over a fixed list of pages. `goto` shows page 0 and every
/// `click_next` advances one page.
#[derive(Clone, Default)]
pub struct ScriptedRenderer {
    pages: Vec<String>,
    fail_open: bool,
    fail_goto: bool,
    fail_click_on_page: Option<usize>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    pub clicks: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRenderer {
    pub fn new<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_goto(mut self) -> Self {
        self.fail_goto = true;
        self
    }

    /// Fail the click issued while `page` (0-based) is displayed.
    pub fn failing_click_on(mut self, page: usize) -> Self {
        self.fail_click_on_page = Some(page);
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn open_session(&self) -> Result<Box<dyn RenderSession>> {
        if self.fail_open {
            return Err(RevexError::Render("browser failed to launch".into()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            renderer: self.clone(),
            current: 0,
        }))
    }
}

struct ScriptedSession {
    renderer: ScriptedRenderer,
    current: usize,
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn goto(&mut self, url: &str) -> Result<PageSnapshot> {
        if self.renderer.fail_goto {
            return Err(RevexError::Render(format!("navigation to {url} timed out")));
        }
        self.current = 0;
        self.renderer
            .pages
            .first()
            .map(PageSnapshot::new)
            .ok_or_else(|| RevexError::Render("no pages scripted".into()))
    }

    async fn click_next(&mut self, locator: &str) -> Result<PageSnapshot> {
        self.renderer.clicks.lock().unwrap().push(locator.to_string());
        if self.renderer.fail_click_on_page == Some(self.current) {
            return Err(RevexError::Render("click timed out".into()));
        }
        self.current += 1;
        self.renderer
            .pages
            .get(self.current)
            .map(PageSnapshot::new)
            .ok_or_else(|| RevexError::Render("clicked past the last page".into()))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.renderer.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A review block using the fallback selector classes.
pub fn fallback_review(title: &str, body: &str, rating: &str, reviewer: &str) -> String {
    format!(
        r#"<div class="target-review-class">
            <h3 class="target-title-class">{title}</h3>
            <p class="target-body-class">{body}</p>
            <span class="target-rating-class">{rating}</span>
            <span class="target-reviewer-class">{reviewer}</span>
        </div>"#
    )
}

/// A full page wrapping `reviews`, with a next link when `has_next`.
pub fn page(reviews: &[String], has_next: bool) -> String {
    let next = if has_next {
        r##"<a class="next-page" href="#">Next</a>"##
    } else {
        ""
    };
    format!(
        "<!DOCTYPE html><html><body><section>{}</section>{next}</body></html>",
        reviews.join("\n")
    )
}
