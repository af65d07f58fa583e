use crate::config::Settings;
use crate::error::RevexError;
use crate::selectors::fallback_selectors;
use crate::types::{SelectorMap, SelectorSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferOptions {
    /// Characters of page HTML embedded in the prompt.
    pub html_budget_chars: usize,
    pub max_output_tokens: usize,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            html_budget_chars: 1_000,
            max_output_tokens: 150,
        }
    }
}

impl From<&Settings> for InferOptions {
    fn from(s: &Settings) -> Self {
        Self {
            html_budget_chars: s.html_budget_chars,
            max_output_tokens: s.max_output_tokens,
        }
    }
}

/// Result of reading model output as a selector mapping. The text is only
/// ever parsed as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(SelectorMap),
    Unparseable(String),
}

/// Result of one inference attempt. `Unavailable` is an expected outcome,
/// not a failure of the request.
#[derive(Debug)]
pub enum Inference {
    Inferred(SelectorMap),
    Unavailable(RevexError),
}

impl Inference {
    /// The inferred selectors, or the fallback mapping when inference was
    /// unavailable.
    pub fn or_fallback(self) -> (SelectorMap, SelectorSource) {
        match self {
            Inference::Inferred(map) => (map, SelectorSource::Inferred),
            Inference::Unavailable(_) => (fallback_selectors(), SelectorSource::Fallback),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Inference::Inferred(_))
    }
}
