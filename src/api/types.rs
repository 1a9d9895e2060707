// src/api/types.rs
//! Wire types shared by the Notion API client and its parsers.

use serde::{Deserialize, Serialize};

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub object: String,
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// The cursor for the next page, or `None` when the store has no more.
    ///
    /// A response claiming more results without a cursor is treated as the
    /// last page.
    pub fn continuation(&self) -> Option<String> {
        if self.has_more {
            self.next_cursor.clone()
        } else {
            None
        }
    }
}

/// Error body returned by the Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionErrorBody {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub status: u16,
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn continuation_requires_has_more() {
        let page: PaginatedResponse<Value> = serde_json::from_str(
            r#"{"object":"list","results":[],"next_cursor":"abc","has_more":false}"#,
        )
        .unwrap();
        assert_eq!(page.continuation(), None);

        let page: PaginatedResponse<Value> = serde_json::from_str(
            r#"{"object":"list","results":[],"next_cursor":"abc","has_more":true}"#,
        )
        .unwrap();
        assert_eq!(page.continuation(), Some("abc".to_string()));

        let page: PaginatedResponse<Value> = serde_json::from_str(
            r#"{"object":"list","results":[],"next_cursor":null,"has_more":true}"#,
        )
        .unwrap();
        assert_eq!(page.continuation(), None);
    }
}
