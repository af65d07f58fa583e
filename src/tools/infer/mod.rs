//! Selector inference from rendered HTML.
//!
//! A bounded prefix of the page goes to the text generator, whose reply is
//! parsed strictly as a JSON object with the five selector roles. Model
//! output is untrusted: it is parsed as data and never evaluated. Any
//! problem along the way yields [`Inference::Unavailable`], which callers
//! answer with the fallback selectors.

pub mod types;
mod utils;

pub use types::*;
use utils::*;

use crate::error::RevexError;
use crate::tools::generate::TextGenerator;
use tracing::{debug, warn};

/// Build the instruction sent to the model for `html`.
pub fn build_prompt(html: &str, html_budget_chars: usize) -> String {
    compose_prompt(truncate_chars(html, html_budget_chars))
}

/// Parse model output into a selector mapping.
pub fn parse_selector_map(text: &str) -> ParseOutcome {
    parse_generated(text)
}

/// Ask the generator for selectors matching `html`.
///
/// Stateless: nothing is cached between pages, even for the same site.
pub async fn infer_selectors(
    generator: &dyn TextGenerator,
    html: &str,
    opts: &InferOptions,
) -> Inference {
    let prompt = build_prompt(html, opts.html_budget_chars);

    let output = match generator.generate(&prompt, opts.max_output_tokens).await {
        Ok(text) => text,
        Err(e) => {
            warn!(generator = generator.name(), error = %e, "text generation unavailable");
            return Inference::Unavailable(e);
        }
    };
    debug!(output = %output, "model output");

    match parse_selector_map(&output) {
        ParseOutcome::Parsed(map) => Inference::Inferred(map),
        ParseOutcome::Unparseable(reason) => {
            warn!(%reason, "model output is not a usable selector map");
            Inference::Unavailable(RevexError::InferenceUnavailable(reason))
        }
    }
}
