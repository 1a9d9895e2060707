// src/server.rs
//! HTTP API serving the site's content as JSON.

use crate::constants::LISTING_CACHE_SECONDS;
use crate::error::AppError;
use crate::queries::{page_size_or_default, ContentQueries};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub queries: ContentQueries,
}

/// Build the HTTP router.
pub fn build_router(queries: ContentQueries) -> Router {
    Router::new()
        .route("/api/listening", get(listening_history))
        .route("/api/writing", get(writing_items))
        .route("/api/writing/{slug}", get(writing_post))
        .route("/health", get(health_check))
        .with_state(AppState { queries })
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(queries: ContentQueries, addr: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    log::info!("Serving content API on http://{}", addr);
    axum::serve(listener, build_router(queries)).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListingParams {
    cursor: Option<String>,
    limit: Option<String>,
}

impl ListingParams {
    fn cursor(&self) -> Option<String> {
        self.cursor.clone().filter(|cursor| !cursor.is_empty())
    }

    fn limit(&self) -> u32 {
        page_size_or_default(self.limit.as_deref())
    }
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn listening_history(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Response {
    match state
        .queries
        .try_listening_history(params.cursor(), params.limit())
        .await
    {
        Ok(page) => cached_response(&page, LISTING_CACHE_SECONDS),
        Err(e) => {
            log::error!("Error fetching listening history: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch listening history",
            )
        }
    }
}

async fn writing_items(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Response {
    match state
        .queries
        .try_writing_items(params.cursor(), params.limit())
        .await
    {
        Ok(page) => cached_response(&page, LISTING_CACHE_SECONDS),
        Err(e) => {
            log::error!("Error fetching writing items: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch writing")
        }
    }
}

async fn writing_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.queries.try_writing_post_by_slug(&slug).await {
        Ok(Some(post)) => cached_response(&post, LISTING_CACHE_SECONDS),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Not found"),
        Err(e) => {
            log::error!("Error fetching writing post {}: {}", slug, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch post")
        }
    }
}

/// 200 JSON response that shared caches may keep for `max_age` seconds.
fn cached_response<T: Serialize>(body: &T, max_age: u64) -> Response {
    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "public, s-maxage={}, stale-while-revalidate=60",
        max_age
    )) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

/// JSON error body; never cached.
fn error_response(status: StatusCode, message: &str) -> Response {
    let mut response = (status, Json(json!({ "error": message }))).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
