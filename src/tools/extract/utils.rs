use crate::error::{Result, RevexError};
use crate::types::{ReviewRecord, SelectorMap, SelectorRole};
use scraper::{ElementRef, Selector};

/// Per-field selectors, compiled once per page. A field selector that does
/// not compile makes every container fail rather than silently reading as
/// "absent".
pub(super) struct FieldSelectors {
    title: std::result::Result<Selector, String>,
    body: std::result::Result<Selector, String>,
    rating: std::result::Result<Selector, String>,
    reviewer: std::result::Result<Selector, String>,
}

impl FieldSelectors {
    pub(super) fn compile(map: &SelectorMap) -> Self {
        let compile = |role: SelectorRole| {
            Selector::parse(map.get(role))
                .map_err(|e| format!("invalid '{role}' selector {:?}: {e:?}", map.get(role)))
        };
        Self {
            title: compile(SelectorRole::Title),
            body: compile(SelectorRole::Body),
            rating: compile(SelectorRole::Rating),
            reviewer: compile(SelectorRole::Reviewer),
        }
    }
}

pub(super) fn extract_record(
    container: &ElementRef<'_>,
    fields: &FieldSelectors,
) -> Result<ReviewRecord> {
    Ok(ReviewRecord {
        title: first_text(container, &fields.title)?,
        body: first_text(container, &fields.body)?,
        rating: first_text(container, &fields.rating)?,
        reviewer: first_text(container, &fields.reviewer)?,
    })
}

/// Trimmed text of the first descendant matching `selector`.
fn first_text(
    container: &ElementRef<'_>,
    selector: &std::result::Result<Selector, String>,
) -> Result<Option<String>> {
    let selector = selector
        .as_ref()
        .map_err(|e| RevexError::FieldExtraction(e.clone()))?;
    Ok(container
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string()))
}
