use super::types::Aborted;
use crate::error::{Result, RevexError};
use crate::tools::render::RenderSession;
use crate::types::{Extraction, PageSummary, ReviewRecord, SelectorSource, StopReason};
use tracing::{debug, warn};

/// State of one extraction request: the render context it owns and the
/// reviews collected so far, in page-visit order.
///
/// The context is released by [`finish`](Self::finish). If the session is
/// dropped first (the request future was cancelled or timed out), `Drop`
/// hands the context to a background task that closes it.
pub struct ExtractionSession {
    render: Option<Box<dyn RenderSession>>,
    reviews: Vec<ReviewRecord>,
    pages: Vec<PageSummary>,
}

impl ExtractionSession {
    pub fn new(render: Box<dyn RenderSession>) -> Self {
        Self {
            render: Some(render),
            reviews: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn render(&mut self) -> Result<&mut dyn RenderSession> {
        match self.render.as_mut() {
            Some(render) => Ok(render.as_mut()),
            None => Err(RevexError::Render("render context already released".into())),
        }
    }

    pub fn pages_visited(&self) -> usize {
        self.pages.len()
    }

    pub fn record_page(&mut self, source: SelectorSource, records: Vec<ReviewRecord>) {
        self.pages.push(PageSummary {
            page: self.pages.len() + 1,
            selector_source: source,
            reviews: records.len(),
        });
        self.reviews.extend(records);
    }

    /// Release the render context and turn the run's outcome into the
    /// final result. Consumes the session, so the context is released once.
    pub async fn finish(
        mut self,
        url: &str,
        outcome: Result<StopReason>,
    ) -> std::result::Result<Extraction, Aborted> {
        if let Some(render) = self.render.take() {
            if let Err(e) = render.close().await {
                warn!(error = %e, "render context did not close cleanly");
            }
            debug!("render context released");
        }

        let reviews = std::mem::take(&mut self.reviews);
        let pages = std::mem::take(&mut self.pages);

        match outcome {
            Ok(stop_reason) => Ok(Extraction {
                url: url.to_string(),
                reviews_count: reviews.len(),
                reviews,
                pages,
                stop_reason,
            }),
            Err(error) => Err(Aborted {
                error,
                partial: reviews,
                pages,
            }),
        }
    }
}

impl Drop for ExtractionSession {
    fn drop(&mut self) {
        let Some(render) = self.render.take() else {
            return;
        };
        warn!(pages = self.pages.len(), "extraction cancelled; releasing render context");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = render.close().await {
                        warn!(error = %e, "render context did not close cleanly");
                    }
                    debug!("render context released after cancellation");
                });
            }
            Err(_) => warn!("no runtime to release the render context on"),
        }
    }
}
