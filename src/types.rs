use crate::error::{Result, RevexError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five roles a page must be mapped onto before extraction can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorRole {
    Review,
    Title,
    Body,
    Rating,
    Reviewer,
}

impl SelectorRole {
    pub const ALL: [SelectorRole; 5] = [
        SelectorRole::Review,
        SelectorRole::Title,
        SelectorRole::Body,
        SelectorRole::Rating,
        SelectorRole::Reviewer,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Title => "title",
            Self::Body => "body",
            Self::Rating => "rating",
            Self::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for SelectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Unchecked wire form of a [`SelectorMap`].
#[derive(Debug, Clone, Deserialize)]
struct RawSelectorMap {
    review: String,
    title: String,
    body: String,
    rating: String,
    reviewer: String,
}

/// Role → CSS selector mapping that drives extraction.
///
/// Only constructible through [`SelectorMap::new`] (or deserialization, which
/// goes through the same check), so every value in circulation has all five
/// selectors present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelectorMap")]
pub struct SelectorMap {
    review: String,
    title: String,
    body: String,
    rating: String,
    reviewer: String,
}

impl SelectorMap {
    pub fn new(
        review: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        rating: impl Into<String>,
        reviewer: impl Into<String>,
    ) -> Result<Self> {
        let map = Self {
            review: review.into().trim().to_string(),
            title: title.into().trim().to_string(),
            body: body.into().trim().to_string(),
            rating: rating.into().trim().to_string(),
            reviewer: reviewer.into().trim().to_string(),
        };
        for role in SelectorRole::ALL {
            if map.get(role).is_empty() {
                return Err(RevexError::InferenceUnavailable(format!(
                    "empty selector for '{role}'"
                )));
            }
        }
        Ok(map)
    }

    pub fn get(&self, role: SelectorRole) -> &str {
        match role {
            SelectorRole::Review => &self.review,
            SelectorRole::Title => &self.title,
            SelectorRole::Body => &self.body,
            SelectorRole::Rating => &self.rating,
            SelectorRole::Reviewer => &self.reviewer,
        }
    }

    pub fn review(&self) -> &str {
        &self.review
    }
}

impl TryFrom<RawSelectorMap> for SelectorMap {
    type Error = RevexError;

    fn try_from(raw: RawSelectorMap) -> Result<Self> {
        SelectorMap::new(raw.review, raw.title, raw.body, raw.rating, raw.reviewer)
    }
}

/// One extracted review. A field is `None` when its selector matched nothing
/// inside the review container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub title: Option<String>,
    pub body: Option<String>,
    pub rating: Option<String>,
    pub reviewer: Option<String>,
}

/// Rendered DOM of the current page, as serialized HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot(String);

impl PageSnapshot {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn html(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the selectors used for a page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorSource {
    Inferred,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last page had no "next" control.
    NoNextPage,
    /// The configured page limit was reached while a "next" control still existed.
    PageLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub page: usize,
    pub selector_source: SelectorSource,
    pub reviews: usize,
}

/// Everything a finished pagination run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub url: String,
    pub reviews_count: usize,
    pub reviews: Vec<ReviewRecord>,
    pub pages: Vec<PageSummary>,
    pub stop_reason: StopReason,
}

/// HTTP success body for `GET /api/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub reviews_count: usize,
    pub reviews: Vec<ReviewRecord>,
}

impl From<Extraction> for ReviewsResponse {
    fn from(e: Extraction) -> Self {
        Self {
            reviews_count: e.reviews.len(),
            reviews: e.reviews,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON envelope printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_map_rejects_blank_roles() {
        let err = SelectorMap::new("div.review", "h3", "  ", "span.rating", "span.author");
        assert!(err.is_err());
    }

    #[test]
    fn selector_map_deserializes_through_validation() {
        let ok: SelectorMap = serde_json::from_str(
            r#"{"review":"div.r","title":"h3","body":"p","rating":".stars","reviewer":".by"}"#,
        )
        .unwrap();
        assert_eq!(ok.review(), "div.r");
        assert_eq!(ok.get(SelectorRole::Reviewer), ".by");

        let missing = serde_json::from_str::<SelectorMap>(
            r#"{"review":"div.r","title":"h3","body":"p","rating":".stars"}"#,
        );
        assert!(missing.is_err());

        let empty = serde_json::from_str::<SelectorMap>(
            r#"{"review":"","title":"h3","body":"p","rating":".stars","reviewer":".by"}"#,
        );
        assert!(empty.is_err());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let record = ReviewRecord {
            title: Some("Great".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Great");
        assert!(json["body"].is_null());
        assert!(json["reviewer"].is_null());
    }
}
