// src/api/pagination.rs
//! Cursor pagination for endpoints that must be read to the end.

use super::types::PaginatedResponse;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;

/// Fetches every page by following cursors until the store reports no more.
///
/// `fetch_fn` receives the page size and the cursor (`None` for the first
/// page). `max_pages` caps the number of requests.
pub async fn fetch_all_pages<T, F, Fut>(
    mut fetch_fn: F,
    max_pages: Option<u32>,
) -> Result<Vec<T>, AppError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(NOTION_API_PAGE_SIZE, cursor).await?;
        cursor = response.continuation();
        all_items.extend(response.results);
        pages_fetched += 1;

        if cursor.is_none() {
            break;
        }
    }

    Ok(all_items)
}
