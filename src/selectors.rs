//! Shared Selectors

use crate::types::SelectorMap;
use once_cell::sync::Lazy;

/// Default locator for the "next page" control.
pub const NEXT_PAGE_SELECTOR: &str = "a.next-page";

/// Last-resort selectors used whenever inference is unavailable.
static FALLBACK_SELECTORS: Lazy<SelectorMap> = Lazy::new(|| {
    SelectorMap::new(
        "div.target-review-class",
        "h3.target-title-class",
        "p.target-body-class",
        "span.target-rating-class",
        "span.target-reviewer-class",
    )
    .expect("valid fallback selectors")
});

/// Fixed fallback mapping. Total and pure.
pub fn fallback_selectors() -> SelectorMap {
    FALLBACK_SELECTORS.clone()
}
