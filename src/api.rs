use crate::tools::generate::TextGenerator;
use crate::tools::paginate::{paginate, PaginateOptions};
use crate::tools::render::Renderer;
use crate::{error::*, types::*};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

// Activity-log writes never fail a request.
fn log_info(host: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
    match crate::log::ActivityLogger::new() {
        Ok(logger) => logger.info(host, event, details),
        Err(_) => Ok(()),
    }
}

fn log_error(host: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
    match crate::log::ActivityLogger::new() {
        Ok(logger) => logger.error(host, event, details),
        Err(_) => Ok(()),
    }
}

/* ------------ extraction entrypoint ------------ */

/// Check the inbound `url` parameter before any browser work happens.
pub fn validate_target(url: Option<&str>) -> Result<Url> {
    let raw = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(RevexError::MissingParameter)?;
    let parsed = Url::parse(raw).map_err(|_| RevexError::InvalidUrl(raw.into()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(RevexError::InvalidUrl(raw.into())),
    }
}

/// Validate `url`, then run a full paginated extraction.
///
/// A fatal error mid-run fails the whole request; reviews collected before
/// it are dropped.
pub async fn extract_url(
    renderer: &dyn Renderer,
    generator: &dyn TextGenerator,
    url: Option<&str>,
    opts: &PaginateOptions,
) -> Result<Extraction> {
    let start_time = Instant::now();
    let target = validate_target(url)?;
    let host = target.host_str().map(str::to_string);

    let result = paginate(renderer, generator, target.as_str(), opts).await;
    let duration = start_time.elapsed();

    match result {
        Ok(extraction) => {
            let details = format!(
                "{} reviews from {} pages in {}ms",
                extraction.reviews_count,
                extraction.pages.len(),
                duration.as_millis()
            );
            let _ = log_info(host.as_deref(), "extract_reviews", Some(&details));
            Ok(extraction)
        }
        Err(aborted) => {
            let details = format!(
                "failed in {}ms after {} pages ({} partial reviews dropped): {}",
                duration.as_millis(),
                aborted.pages.len(),
                aborted.partial.len(),
                aborted.error
            );
            if aborted.error.is_fatal() {
                tracing::error!(url = target.as_str(), "{details}");
            } else {
                tracing::warn!(url = target.as_str(), "{details}");
            }
            let _ = log_error(host.as_deref(), "extract_reviews", Some(&details));
            Err(aborted.error)
        }
    }
}

/* ------------ HTTP surface ------------ */

/// Capabilities shared by every request. Each request still gets its own
/// render session.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<dyn Renderer>,
    pub generator: Arc<dyn TextGenerator>,
    pub options: PaginateOptions,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    pub url: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/favicon.ico", get(favicon))
        .route("/api/reviews", get(get_reviews))
        .with_state(state)
}

pub async fn serve(bind: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("review API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn home() -> &'static str {
    "Welcome to the Universal Review Extractor API!"
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn get_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewsQuery>,
) -> Response {
    let result = extract_url(
        state.renderer.as_ref(),
        state.generator.as_ref(),
        query.url.as_deref(),
        &state.options,
    )
    .await;

    match result {
        Ok(extraction) => Json(ReviewsResponse::from(extraction)).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &RevexError) -> Response {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fallback_review, page, ScriptedGenerator, ScriptedRenderer};
    use crate::tools::generate::DisabledGenerator;
    use serde_json::Value;

    fn state(renderer: &ScriptedRenderer, generator: Arc<dyn TextGenerator>) -> AppState {
        AppState {
            renderer: Arc::new(renderer.clone()),
            generator,
            options: PaginateOptions::default(),
        }
    }

    async fn call(state: AppState, url: Option<&str>) -> (StatusCode, Value) {
        let response = get_reviews(
            State(state),
            Query(ReviewsQuery {
                url: url.map(str::to_string),
            }),
        )
        .await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn target_validation() {
        assert!(matches!(validate_target(None), Err(RevexError::MissingParameter)));
        assert!(matches!(validate_target(Some("  ")), Err(RevexError::MissingParameter)));
        assert!(matches!(validate_target(Some("not a url")), Err(RevexError::InvalidUrl(_))));
        assert!(matches!(
            validate_target(Some("file:///etc/passwd")),
            Err(RevexError::InvalidUrl(_))
        ));
        assert_eq!(
            validate_target(Some("https://shop.example/p?page=1")).unwrap().host_str(),
            Some("shop.example")
        );
    }

    #[tokio::test]
    async fn missing_url_is_client_error_without_session() {
        let renderer = ScriptedRenderer::new([page(&[], false)]);
        let (status, body) = call(state(&renderer, Arc::new(DisabledGenerator)), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL parameter is required");
        assert_eq!(renderer.opened(), 0);
        assert_eq!(renderer.closed(), 0);
    }

    #[tokio::test]
    async fn three_reviews_on_static_page() {
        let reviews: Vec<String> = ["One", "Two", "Three"]
            .iter()
            .map(|t| fallback_review(t, "body", "5", "someone"))
            .collect();
        let renderer = ScriptedRenderer::new([page(&reviews, false)]);
        let generator: Arc<dyn TextGenerator> = Arc::new(ScriptedGenerator::replying("???"));

        let url = Some("https://shop.example/item");
        let (status, body) = call(state(&renderer, generator), url).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reviews_count"], 3);
        let list = body["reviews"].as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[2]["title"], "Three");
        for review in list {
            for field in ["title", "body", "rating", "reviewer"] {
                assert!(review[field].is_string(), "{field} should be populated");
            }
        }
        assert_eq!(renderer.closed(), 1);
    }

    #[tokio::test]
    async fn zero_matches_is_empty_success() {
        let renderer = ScriptedRenderer::new([page(&["<p>No reviews yet</p>".to_string()], false)]);
        let (status, body) = call(
            state(&renderer, Arc::new(ScriptedGenerator::replying("nope"))),
            Some("https://shop.example"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reviews_count"], 0);
        assert_eq!(body["reviews"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn two_pages_concatenate() {
        let renderer = ScriptedRenderer::new([
            page(&[fallback_review("a", "b", "1", "c")], true),
            page(
                &[fallback_review("d", "e", "2", "f"), fallback_review("g", "h", "3", "i")],
                false,
            ),
        ]);
        let (status, body) = call(
            state(&renderer, Arc::new(DisabledGenerator)),
            Some("https://shop.example"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reviews_count"], 3);
        let titles: Vec<&str> = body["reviews"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["a", "d", "g"]);
    }

    #[tokio::test]
    async fn render_failure_is_server_error_and_releases_session() {
        let renderer = ScriptedRenderer::new([page(&[], false)]).failing_goto();
        let (status, body) = call(
            state(&renderer, Arc::new(DisabledGenerator)),
            Some("https://shop.example"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("timed out"));
        assert!(body.get("reviews").is_none());
        assert_eq!(renderer.opened(), 1);
        assert_eq!(renderer.closed(), 1);
    }

    #[tokio::test]
    async fn mid_walk_failure_drops_partial_results() {
        let renderer = ScriptedRenderer::new([
            page(&[fallback_review("a", "b", "1", "c")], true),
            page(&[], false),
        ])
        .failing_click_on(0);
        let (status, body) = call(
            state(&renderer, Arc::new(DisabledGenerator)),
            Some("https://shop.example"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("reviews_count").is_none());
        assert_eq!(renderer.closed(), 1);
    }
}
