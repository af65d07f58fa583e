use scraper::{Html, Selector};
use tracing::warn;

/// Whether the page contains the "next page" control. An unusable locator
/// means no further pages.
pub(super) fn has_next_control(html: &str, locator: &str) -> bool {
    let selector = match Selector::parse(locator) {
        Ok(sel) => sel,
        Err(e) => {
            warn!(locator, error = ?e, "next-page locator does not compile");
            return false;
        }
    };
    let doc = Html::parse_document(html);
    doc.select(&selector).next().is_some()
}
