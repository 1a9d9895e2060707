//! In-memory Notion workspace shared by the integration tests.
#![allow(dead_code)]

use portfolio_notion::api::{DatabaseQuery, NotionRepository, PaginatedResponse};
use portfolio_notion::{AppError, NotionErrorCode, NotionId};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

pub const WRITING_DB: &str = "11111111111111111111111111111111";
pub const MUSIC_DB: &str = "22222222222222222222222222222222";

/// Serves database rows in insertion order (callers insert them pre-sorted),
/// honouring `page_size`, `start_cursor` and the two filter kinds the site
/// uses. Every query body is recorded.
#[derive(Default)]
pub struct FakeNotion {
    databases: Mutex<HashMap<String, Vec<Value>>>,
    pages: HashMap<String, Value>,
    children: HashMap<String, Vec<Value>>,
    failing: bool,
    pub queries: Mutex<Vec<Value>>,
    pub created: Mutex<Vec<Value>>,
}

impl FakeNotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// A workspace whose every call fails like an unreachable server.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_rows(self, database: &str, rows: Vec<Value>) -> Self {
        self.databases
            .lock()
            .unwrap()
            .insert(database.to_string(), rows);
        self
    }

    /// Registers a retrievable page; it is also returned by id lookups.
    pub fn with_page(mut self, page: Value) -> Self {
        let id = NotionId::parse(page["id"].as_str().unwrap()).unwrap();
        self.pages.insert(id.as_str().to_string(), page);
        self
    }

    pub fn with_children(mut self, parent: &str, blocks: Vec<Value>) -> Self {
        let id = NotionId::parse(parent).unwrap();
        self.children.insert(id.as_str().to_string(), blocks);
        self
    }

    pub fn recorded_queries(&self) -> Vec<Value> {
        self.queries.lock().unwrap().clone()
    }

    fn unavailable() -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::ServiceUnavailable,
            message: "upstream down".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn not_found(id: &NotionId) -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::ObjectNotFound,
            message: format!("Could not find page with ID: {}", id.to_hyphenated()),
            status: StatusCode::NOT_FOUND,
        }
    }
}

fn matches_filter(row: &Value, filter: &Value) -> bool {
    let Some(property) = filter["property"].as_str() else {
        return true;
    };
    let value = &row["properties"][property];
    if let Some(expected) = filter["rich_text"]["equals"].as_str() {
        return value["rich_text"][0]["plain_text"].as_str() == Some(expected);
    }
    if filter["date"]["is_not_empty"] == json!(true) {
        return value["date"]["start"].is_string();
    }
    true
}

fn paginate(rows: Vec<Value>, cursor: Option<&str>, page_size: usize) -> PaginatedResponse<Value> {
    let start = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
    let end = (start + page_size).min(rows.len());
    let has_more = end < rows.len();

    PaginatedResponse {
        object: "list".to_string(),
        results: rows.get(start..end).map(<[Value]>::to_vec).unwrap_or_default(),
        next_cursor: has_more.then(|| end.to_string()),
        has_more,
    }
}

#[async_trait::async_trait]
impl NotionRepository for FakeNotion {
    async fn query_database(
        &self,
        database: &NotionId,
        query: &DatabaseQuery,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        let body = serde_json::to_value(query)?;
        self.queries.lock().unwrap().push(body.clone());
        if self.failing {
            return Err(Self::unavailable());
        }

        let rows: Vec<Value> = self
            .databases
            .lock()
            .unwrap()
            .get(database.as_str())
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| matches_filter(row, &body["filter"]))
            .collect();

        Ok(paginate(
            rows,
            query.start_cursor.as_deref(),
            query.page_size.unwrap_or(100) as usize,
        ))
    }

    async fn retrieve_page(&self, id: &NotionId) -> Result<Value, AppError> {
        if self.failing {
            return Err(Self::unavailable());
        }
        self.pages
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn retrieve_children(
        &self,
        parent: &NotionId,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        if self.failing {
            return Err(Self::unavailable());
        }
        let blocks = self.children.get(parent.as_str()).cloned().unwrap_or_default();
        Ok(paginate(blocks, cursor, page_size as usize))
    }

    async fn create_page(&self, body: &Value) -> Result<Value, AppError> {
        if self.failing {
            return Err(Self::unavailable());
        }
        let database = NotionId::parse(body["parent"]["database_id"].as_str().unwrap_or(""))?;
        let mut databases = self.databases.lock().unwrap();
        let rows = databases.entry(database.as_str().to_string()).or_default();

        let mut page = body.clone();
        page["id"] = json!(format!("{:032x}", rows.len() + 0x100));
        page["created_time"] = json!("2024-06-01T00:00:00.000Z");
        // newest first, like the listening-history sort
        rows.insert(0, page.clone());
        self.created.lock().unwrap().push(body.clone());
        Ok(page)
    }
}

// ---------------------------------------------------------------------------
// Row builders
// ---------------------------------------------------------------------------

pub fn title(text: &str) -> Value {
    json!({"type": "title", "title": [{"type": "text", "plain_text": text, "text": {"content": text}}]})
}

pub fn rich_text(text: &str) -> Value {
    json!({"type": "rich_text", "rich_text": [{"type": "text", "plain_text": text, "text": {"content": text}}]})
}

pub fn date(start: &str) -> Value {
    json!({"type": "date", "date": {"start": start, "end": null}})
}

pub fn url(value: &str) -> Value {
    json!({"type": "url", "url": value})
}

pub fn select(name: &str) -> Value {
    json!({"type": "select", "select": {"id": "opt", "name": name, "color": "default"}})
}

/// A writing-database row.
pub fn post(id: &str, name: &str, slug: &str, published: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": "2024-01-01T00:00:00.000Z",
        "properties": {
            "Name": title(name),
            "Slug": rich_text(slug),
            "Published": date(published),
            "URL": url("https://example.com/posts/first"),
            "Excerpt": rich_text("A short summary.")
        }
    })
}

/// A listening-history row.
pub fn play(id: &str, name: &str, played_at: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": "2024-01-01T00:00:00.000Z",
        "icon": {"type": "external", "external": {"url": format!("https://i.scdn.co/{}", name)}},
        "properties": {
            "Name": title(name),
            "Artist": rich_text("Boards of Canada"),
            "Album": rich_text("Geogaddi"),
            "Played At": date(played_at),
            "Spotify URL": url("https://open.spotify.com/track/x")
        }
    })
}

pub fn paragraph(id: &str, text: &str, has_children: bool) -> Value {
    json!({
        "object": "block",
        "id": id,
        "type": "paragraph",
        "has_children": has_children,
        "paragraph": {"rich_text": [{"type": "text", "plain_text": text}]}
    })
}

pub fn block_id(n: u32) -> String {
    format!("b{:031x}", n)
}
