//! Query layer against an in-memory workspace: guards, paging, defaults and
//! failure absorption.

mod common;

use common::*;
use portfolio_notion::api::{DatabaseQuery, PaginatedResponse};
use portfolio_notion::decode::decode_content_item;
use portfolio_notion::{
    AppError, ContentQueries, ContentSources, ItemPage, NotionHttpClient, NotionId,
    NotionRepository, SourceId,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

fn sources() -> ContentSources {
    ContentSources {
        writing: Some(SourceId::new("writing", NotionId::parse(WRITING_DB).unwrap())),
        listening: Some(SourceId::new("listening", NotionId::parse(MUSIC_DB).unwrap())),
    }
}

fn setup(fake: FakeNotion) -> (ContentQueries, Arc<FakeNotion>) {
    let fake = Arc::new(fake);
    let repo: Arc<dyn NotionRepository> = fake.clone();
    (ContentQueries::new(repo, sources()), fake)
}

fn page_id(n: u32) -> String {
    format!("{:08x}-0000-4000-8000-{:012x}", n, n)
}

#[tokio::test]
async fn records_without_properties_are_skipped_in_order() {
    let mut empty_bag = play(&page_id(2), "Skipped", "2024-05-01T09:00:00.000Z");
    empty_bag["properties"] = json!({});

    let (queries, _) = setup(FakeNotion::new().with_rows(
        MUSIC_DB,
        vec![
            play(&page_id(1), "Alpha", "2024-05-01T10:00:00.000Z"),
            empty_bag,
            play(&page_id(3), "Gamma", "2024-05-01T08:00:00.000Z"),
        ],
    ));

    let page = queries.listening_history(None, 20).await;
    let names: Vec<&str> = page.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Gamma"]);
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn cursor_pages_do_not_overlap() {
    let rows = (1..=45)
        .map(|n| play(&page_id(n), &format!("Track {}", n), "2024-05-01T10:00:00.000Z"))
        .collect();
    let (queries, fake) = setup(FakeNotion::new().with_rows(MUSIC_DB, rows));

    let first = queries.listening_history(None, 20).await;
    assert_eq!(first.items.len(), 20);
    assert!(first.has_more());

    let second = queries
        .listening_history(first.next_cursor.clone(), 20)
        .await;
    assert_eq!(second.items.len(), 20);

    let first_ids: HashSet<&str> = first.items.iter().map(|i| i.id.as_str()).collect();
    assert!(second.items.iter().all(|i| !first_ids.contains(i.id.as_str())));

    let third = queries.listening_history(second.next_cursor, 20).await;
    assert_eq!(third.items.len(), 5);
    assert_eq!(third.next_cursor, None);

    let sent = fake.recorded_queries();
    assert_eq!(sent.len(), 3);
    assert_eq!(
        sent[0],
        json!({"sorts": [{"property": "Played At", "direction": "descending"}], "page_size": 20})
    );
    assert_eq!(sent[1]["start_cursor"], json!("20"));
}

#[tokio::test]
async fn listening_defaults_fill_every_gap() {
    let bare = json!({
        "id": page_id(7),
        "created_time": "2024-02-02T02:02:00.000Z",
        "icon": {"type": "emoji", "emoji": "🎵"},
        "properties": {"Artist": {"type": "rich_text", "rich_text": []}}
    });
    let (queries, _) = setup(FakeNotion::new().with_rows(MUSIC_DB, vec![bare]));

    let item = queries.listening_history(None, 20).await.items.remove(0);
    assert_eq!(item.name, "Untitled");
    assert_eq!(item.artist, "");
    assert_eq!(item.album, "");
    assert_eq!(item.played_at, "2024-02-02T02:02:00.000Z");
    assert_eq!(item.url, None);
    assert_eq!(item.image, None);
}

#[tokio::test]
async fn listening_urls_are_kept_verbatim() {
    let (queries, _) = setup(FakeNotion::new().with_rows(
        MUSIC_DB,
        vec![play(&page_id(1), "Alpha", "2024-05-01T10:00:00.000Z")],
    ));

    let item = queries.listening_history(None, 20).await.items.remove(0);
    assert_eq!(item.url.as_deref(), Some("https://open.spotify.com/track/x"));
    assert_eq!(item.image.as_deref(), Some("https://i.scdn.co/Alpha"));
}

#[tokio::test]
async fn writing_lists_only_published_posts() {
    let mut draft = post(&page_id(2), "Draft", "draft", "2024-01-01");
    draft["properties"]["Published"] = json!({"type": "date", "date": null});

    let (queries, fake) = setup(FakeNotion::new().with_rows(
        WRITING_DB,
        vec![
            post(&page_id(1), "First Post", "first-post", "2024-03-01"),
            draft,
        ],
    ));

    let page = queries.writing_items(None, 20).await;
    assert_eq!(page.items.len(), 1);

    let item = &page.items[0];
    assert_eq!(item.title, "First Post");
    assert_eq!(item.category, "Writing");
    assert_eq!(item.status, "Published");
    assert_eq!(item.published, "2024-03-01");
    assert_eq!(item.source.as_deref(), Some("example.com/posts/first"));
    assert_eq!(item.slug, "first-post");
    assert_eq!(item.excerpt.as_deref(), Some("A short summary."));
    assert_eq!(item.feature_image, None);

    assert_eq!(
        fake.recorded_queries()[0]["filter"],
        json!({"property": "Published", "date": {"is_not_empty": true}})
    );
}

#[tokio::test]
async fn transport_failure_yields_an_empty_page() {
    let (queries, _) = setup(FakeNotion::failing());

    assert_eq!(queries.writing_items(None, 20).await, ItemPage::empty());
    assert_eq!(queries.listening_history(None, 20).await, ItemPage::empty());
    assert!(queries.try_listening_history(None, 20).await.is_err());
}

#[tokio::test]
async fn unreachable_store_yields_an_empty_page() {
    let key = portfolio_notion::ApiKey::new("secret_0123456789abcdefghij").unwrap();
    let client = NotionHttpClient::with_base_url(&key, "http://127.0.0.1:9/v1").unwrap();
    let queries = ContentQueries::new(Arc::new(client), sources());

    let page = queries.listening_history(None, 20).await;
    assert!(page.items.is_empty());
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn missing_source_is_an_error_only_for_try() {
    let fake: Arc<dyn NotionRepository> = Arc::new(FakeNotion::new());
    let queries = ContentQueries::new(fake, ContentSources::default());

    assert!(queries.try_writing_items(None, 20).await.is_err());
    assert_eq!(queries.writing_items(None, 20).await, ItemPage::empty());
    assert_eq!(queries.writing_post_by_slug("anything").await, None);
}

#[tokio::test]
async fn slug_lookup_returns_post_with_blocks() {
    let id = page_id(1);
    let nested = block_id(2);
    let (queries, fake) = setup(
        FakeNotion::new()
            .with_rows(
                WRITING_DB,
                vec![
                    post(&id, "First Post", "first-post", "2024-03-01"),
                    post(&page_id(9), "Other", "other", "2024-02-01"),
                ],
            )
            .with_page(post(&id, "First Post", "first-post", "2024-03-01"))
            .with_children(
                &id,
                vec![
                    paragraph(&block_id(1), "Hello", false),
                    paragraph(&nested, "Outer", true),
                ],
            )
            .with_children(&nested, vec![paragraph(&block_id(3), "Inner", false)]),
    );

    let post = queries.writing_post_by_slug("first-post").await.unwrap();
    assert_eq!(post.metadata.slug, "first-post");
    assert_eq!(post.blocks.len(), 2);
    assert_eq!(post.blocks[0].text, "Hello");
    assert_eq!(post.blocks[1].children.len(), 1);
    assert_eq!(post.blocks[1].children[0].text, "Inner");

    assert_eq!(
        fake.recorded_queries()[0]["filter"],
        json!({"property": "Slug", "rich_text": {"equals": "first-post"}})
    );
}

#[tokio::test]
async fn slug_without_match_is_not_found() {
    let (queries, _) = setup(FakeNotion::new().with_rows(
        WRITING_DB,
        vec![post(&page_id(1), "First Post", "first-post", "2024-03-01")],
    ));

    assert_eq!(queries.try_writing_post_by_slug("nope").await.unwrap(), None);
    assert_eq!(queries.writing_post_by_slug("nope").await, None);
}

#[tokio::test]
async fn full_content_uses_generic_defaults() {
    let id = page_id(4);
    let page = json!({
        "id": id,
        "created_time": "2024-04-04T00:00:00.000Z",
        "properties": {
            "Name": title("Notes"),
            "Source": url("https://example.com/x"),
            "Category": {"type": "select", "select": null}
        }
    });
    let (queries, _) = setup(FakeNotion::new().with_page(page));

    let content = queries.full_content(&id).await.unwrap();
    assert_eq!(content.metadata.title, "Notes");
    assert_eq!(content.metadata.category, "Uncategorized");
    assert_eq!(content.metadata.status, "Draft");
    assert_eq!(content.metadata.published, "2024-04-04T00:00:00.000Z");
    assert_eq!(content.metadata.source.as_deref(), Some("example.com/x"));
    assert!(content.blocks.is_empty());

    let (queries, _) = queries_with_select();
    let content = queries.fetch_single_by_id(&page_id(5), decode_content_item).await;
    assert_eq!(content.unwrap().metadata.category, "Projects");
}

fn queries_with_select() -> (ContentQueries, Arc<FakeNotion>) {
    setup(FakeNotion::new().with_page(json!({
        "id": page_id(5),
        "created_time": "2024-04-04T00:00:00.000Z",
        "properties": {"Category": select("Projects"), "Status": select("Live")}
    })))
}

#[tokio::test]
async fn unknown_or_malformed_page_ids_read_as_absent() {
    let (queries, _) = setup(FakeNotion::new());

    assert_eq!(queries.full_content(&page_id(99)).await, None);
    assert_eq!(queries.try_fetch_single_by_id(&page_id(99), decode_content_item).await.unwrap(), None);
    assert_eq!(queries.full_content("not a page").await, None);
    assert!(queries
        .try_fetch_single_by_id("not a page", decode_content_item)
        .await
        .is_err());
}

/// Ignores `page_size` and always sends five records with a cursor; fails
/// once the caller follows that cursor.
struct OverfullStore;

#[async_trait::async_trait]
impl NotionRepository for OverfullStore {
    async fn query_database(
        &self,
        _database: &NotionId,
        query: &DatabaseQuery,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        if query.start_cursor.is_some() {
            return Err(AppError::MalformedResponse("truncated body".to_string()));
        }
        Ok(PaginatedResponse {
            object: "list".to_string(),
            results: (1..=5)
                .map(|n| play(&page_id(n), &format!("Track {}", n), "2024-05-01T10:00:00.000Z"))
                .collect(),
            next_cursor: Some("c".to_string()),
            has_more: true,
        })
    }

    async fn retrieve_page(&self, _id: &NotionId) -> Result<Value, AppError> {
        Err(AppError::MissingConfiguration("not used".to_string()))
    }

    async fn retrieve_children(
        &self,
        _parent: &NotionId,
        _cursor: Option<&str>,
        _page_size: u32,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        Err(AppError::MissingConfiguration("not used".to_string()))
    }

    async fn create_page(&self, _body: &Value) -> Result<Value, AppError> {
        Err(AppError::MissingConfiguration("not used".to_string()))
    }
}

#[tokio::test]
async fn oversized_store_pages_are_cut_to_the_requested_size() {
    let queries = ContentQueries::new(Arc::new(OverfullStore), sources());

    let page = queries.listening_history(None, 2).await;
    let names: Vec<&str> = page.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Track 1", "Track 2"]);
    assert_eq!(page.next_cursor.as_deref(), Some("c"));

    assert_eq!(
        queries.listening_history(page.next_cursor.clone(), 2).await,
        ItemPage::empty()
    );
    assert!(queries
        .try_listening_history(page.next_cursor, 2)
        .await
        .is_err());
}
