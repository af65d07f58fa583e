use crate::config::Settings;
use crate::error::RevexError;
use crate::selectors::NEXT_PAGE_SELECTOR;
use crate::tools::infer::InferOptions;
use crate::types::{PageSummary, ReviewRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginateOptions {
    /// Upper bound on rendered pages; `None` follows "next" until it disappears.
    pub max_pages: Option<usize>,
    /// Locator of the "next page" control.
    pub next_selector: String,
    pub infer: InferOptions,
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            max_pages: Some(50),
            next_selector: NEXT_PAGE_SELECTOR.into(),
            infer: InferOptions::default(),
        }
    }
}

impl From<&Settings> for PaginateOptions {
    fn from(s: &Settings) -> Self {
        Self {
            max_pages: s.max_pages(),
            next_selector: s.next_selector.clone(),
            infer: InferOptions::from(s),
        }
    }
}

/// A session that ended on a fatal error. Carries whatever was collected
/// before the failure; callers treat the request as failed.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Aborted {
    #[source]
    pub error: RevexError,
    pub partial: Vec<ReviewRecord>,
    pub pages: Vec<PageSummary>,
}

impl Aborted {
    pub fn before_start(error: RevexError) -> Self {
        Self {
            error,
            partial: Vec::new(),
            pages: Vec::new(),
        }
    }
}
