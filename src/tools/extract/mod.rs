mod utils;

use utils::*;

use crate::types::{PageSnapshot, ReviewRecord, SelectorMap};
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Extract one [`ReviewRecord`] per element matching the review selector.
///
/// Containers come back in document order. Nested matches are kept as
/// separate records. A container that fails to extract is skipped and the
/// rest of the page still comes back. Fields whose selector matches nothing
/// inside the container are `None`.
pub fn extract_reviews(snapshot: &PageSnapshot, selectors: &SelectorMap) -> Vec<ReviewRecord> {
    extract_reviews_from_html(snapshot.html(), selectors)
}

/// Same as [`extract_reviews`] over raw HTML.
pub fn extract_reviews_from_html(html: &str, selectors: &SelectorMap) -> Vec<ReviewRecord> {
    let container_selector = match Selector::parse(selectors.review()) {
        Ok(sel) => sel,
        Err(e) => {
            warn!(selector = selectors.review(), error = ?e, "review selector does not compile");
            return Vec::new();
        }
    };
    let fields = FieldSelectors::compile(selectors);
    let doc = Html::parse_document(html);

    let mut records = Vec::new();
    for (idx, container) in doc.select(&container_selector).enumerate() {
        match extract_record(&container, &fields) {
            Ok(record) => records.push(record),
            Err(e) => warn!(container = idx, error = %e, "skipping review container"),
        }
    }
    debug!(found = records.len(), "extracted reviews");
    records
}
