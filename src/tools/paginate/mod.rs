//! Pagination controller.
//!
//! Per page, strictly in order: infer selectors (or fall back), extract
//! reviews, look for the "next page" control, click it and go again. Stops
//! when the control is missing or the page limit is hit. A render failure
//! at any point aborts the session. The render context is released on
//! every exit path, including cancellation of the returned future.

mod session;
pub mod types;
mod utils;

pub use session::ExtractionSession;
pub use types::*;
use utils::*;

use crate::error::Result;
use crate::tools::extract::extract_reviews;
use crate::tools::generate::TextGenerator;
use crate::tools::infer::infer_selectors;
use crate::tools::render::Renderer;
use crate::types::{Extraction, StopReason};
use tracing::{info, warn};

/// Extract every review reachable from `url` by following "next page".
pub async fn paginate(
    renderer: &dyn Renderer,
    generator: &dyn TextGenerator,
    url: &str,
    opts: &PaginateOptions,
) -> std::result::Result<Extraction, Aborted> {
    let render = renderer
        .open_session()
        .await
        .map_err(Aborted::before_start)?;

    let mut session = ExtractionSession::new(render);
    let outcome = walk_pages(&mut session, generator, url, opts).await;

    match &outcome {
        Ok(reason) => info!(url, pages = session.pages_visited(), ?reason, "pagination finished"),
        Err(e) => warn!(url, pages = session.pages_visited(), error = %e, "pagination aborted"),
    }

    session.finish(url, outcome).await
}

async fn walk_pages(
    session: &mut ExtractionSession,
    generator: &dyn TextGenerator,
    url: &str,
    opts: &PaginateOptions,
) -> Result<StopReason> {
    let mut snapshot = session.render()?.goto(url).await?;

    loop {
        let page = session.pages_visited() + 1;
        info!(page, bytes = snapshot.len(), "page rendered");

        let (selectors, source) = infer_selectors(generator, snapshot.html(), &opts.infer)
            .await
            .or_fallback();
        let records = extract_reviews(&snapshot, &selectors);
        info!(page, ?source, reviews = records.len(), "page extracted");
        session.record_page(source, records);

        if !has_next_control(snapshot.html(), &opts.next_selector) {
            return Ok(StopReason::NoNextPage);
        }
        if opts.max_pages.is_some_and(|max| page >= max) {
            warn!(page, "page limit reached with a next control still present");
            return Ok(StopReason::PageLimit);
        }

        info!(page, locator = %opts.next_selector, "following next page");
        snapshot = session.render()?.click_next(&opts.next_selector).await?;
    }
}
