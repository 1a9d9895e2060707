// src/queries.rs
//! The Query Layer: one request, guard, map, return.
//!
//! Every read comes in two forms. `try_*` propagates failures as `AppError`
//! and reports a missing record as `Ok(None)`. The plain form absorbs every
//! failure at this boundary: it logs the error and answers with an empty
//! page or `None`, so callers never see an error value.

use crate::api::{DatabaseQuery, NotionRepository, PropertyFilter, PropertySort};
use crate::blocks::get_all_blocks;
use crate::constants::DEFAULT_PAGE_SIZE;
use crate::decode::{
    decode_content_item, decode_listening_item, decode_records, decode_writing_item, Decoder,
    PageRecord,
};
use crate::error::AppError;
use crate::model::{ItemPage, NotionItem, NotionListeningHistoryItem, PostContent};
use crate::schema::labels;
use crate::types::{NotionId, SourceId};
use std::sync::Arc;

/// The databases the site reads from. Unset sources make their queries fail.
#[derive(Debug, Clone, Default)]
pub struct ContentSources {
    pub writing: Option<SourceId>,
    pub listening: Option<SourceId>,
}

/// Read access to the site's content, shared by every request handler.
#[derive(Clone)]
pub struct ContentQueries {
    repo: Arc<dyn NotionRepository>,
    sources: ContentSources,
}

impl ContentQueries {
    pub fn new(repo: Arc<dyn NotionRepository>, sources: ContentSources) -> Self {
        Self { repo, sources }
    }

    pub fn repository(&self) -> &dyn NotionRepository {
        self.repo.as_ref()
    }

    pub fn sources(&self) -> &ContentSources {
        &self.sources
    }

    fn require<'a>(
        source: Option<&'a SourceId>,
        name: &str,
    ) -> Result<&'a SourceId, AppError> {
        source.ok_or_else(|| {
            AppError::MissingConfiguration(format!("{} database id is not set", name))
        })
    }

    // ===== Generic listing =====

    /// Fetches one page of `source`, normalized with `decode`.
    ///
    /// Exactly one query is sent. Records without a property bag are skipped,
    /// order is preserved, and `next_cursor` is set only when the store has
    /// more results.
    pub async fn try_fetch_page<T>(
        &self,
        source: &SourceId,
        cursor: Option<String>,
        page_size: u32,
        filter: Option<PropertyFilter>,
        sort: Option<PropertySort>,
        decode: Decoder<T>,
    ) -> Result<ItemPage<T>, AppError> {
        let mut query = DatabaseQuery::new()
            .start_cursor(cursor)
            .page_size(page_size);
        if let Some(filter) = filter {
            query = query.filter(filter);
        }
        if let Some(sort) = sort {
            query = query.sort(sort);
        }

        let response = self.repo.query_database(source.id(), &query).await?;
        let next_cursor = response.continuation();
        let mut items = decode_records(response.results, decode);

        if items.len() > page_size as usize {
            log::warn!(
                "{} returned {} records for a page of {}; truncating",
                source,
                items.len(),
                page_size
            );
            items.truncate(page_size as usize);
        }

        log::debug!(
            "Fetched {} items from {} (more: {})",
            items.len(),
            source,
            next_cursor.is_some()
        );
        Ok(ItemPage { items, next_cursor })
    }

    /// [`Self::try_fetch_page`], with failures logged and turned into an
    /// empty page.
    pub async fn fetch_page<T>(
        &self,
        source: &SourceId,
        cursor: Option<String>,
        page_size: u32,
        filter: Option<PropertyFilter>,
        sort: Option<PropertySort>,
        decode: Decoder<T>,
    ) -> ItemPage<T> {
        self.try_fetch_page(source, cursor, page_size, filter, sort, decode)
            .await
            .unwrap_or_else(|e| {
                log::error!("Error fetching items from {}: {}", source, e);
                ItemPage::empty()
            })
    }

    // ===== Writing =====

    /// Published posts, newest first.
    pub async fn try_writing_items(
        &self,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<ItemPage<NotionItem>, AppError> {
        let source = Self::require(self.sources.writing.as_ref(), "Writing")?;
        self.try_fetch_page(
            source,
            cursor,
            page_size,
            Some(PropertyFilter::date_is_not_empty(labels::PUBLISHED)),
            Some(PropertySort::descending(labels::PUBLISHED)),
            decode_writing_item,
        )
        .await
    }

    pub async fn writing_items(
        &self,
        cursor: Option<String>,
        page_size: u32,
    ) -> ItemPage<NotionItem> {
        self.try_writing_items(cursor, page_size)
            .await
            .unwrap_or_else(|e| {
                log::error!("Error fetching writing items: {}", e);
                ItemPage::empty()
            })
    }

    // ===== Listening history =====

    /// Plays, most recent first.
    pub async fn try_listening_history(
        &self,
        cursor: Option<String>,
        page_size: u32,
    ) -> Result<ItemPage<NotionListeningHistoryItem>, AppError> {
        let source = Self::require(self.sources.listening.as_ref(), "Listening history")?;
        self.try_fetch_page(
            source,
            cursor,
            page_size,
            None,
            Some(PropertySort::descending(labels::PLAYED_AT)),
            decode_listening_item,
        )
        .await
    }

    pub async fn listening_history(
        &self,
        cursor: Option<String>,
        page_size: u32,
    ) -> ItemPage<NotionListeningHistoryItem> {
        self.try_listening_history(cursor, page_size)
            .await
            .unwrap_or_else(|e| {
                log::error!("Error fetching listening history items: {}", e);
                ItemPage::empty()
            })
    }

    // ===== Single records =====

    /// Retrieves one record and its body blocks.
    ///
    /// `Ok(None)` when the store has no such page or the page has no property
    /// bag.
    pub async fn try_fetch_single_by_id(
        &self,
        page_id: &str,
        decode: Decoder<NotionItem>,
    ) -> Result<Option<PostContent>, AppError> {
        let id = NotionId::parse(page_id)?;

        let raw = match self.repo.retrieve_page(&id).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let Some(record) = PageRecord::guard(raw) else {
            log::debug!("Page {} has no properties", page_id);
            return Ok(None);
        };
        let metadata = decode(&record);
        let blocks = get_all_blocks(self.repo.as_ref(), &id).await?;

        Ok(Some(PostContent { metadata, blocks }))
    }

    pub async fn fetch_single_by_id(
        &self,
        page_id: &str,
        decode: Decoder<NotionItem>,
    ) -> Option<PostContent> {
        self.try_fetch_single_by_id(page_id, decode)
            .await
            .unwrap_or_else(|e| {
                log::error!("Error fetching content for page {}: {}", page_id, e);
                None
            })
    }

    /// Any page, read with the generic content layout.
    pub async fn full_content(&self, page_id: &str) -> Option<PostContent> {
        self.fetch_single_by_id(page_id, decode_content_item).await
    }

    /// A writing post by page id.
    pub async fn writing_post(&self, page_id: &str) -> Option<PostContent> {
        self.fetch_single_by_id(page_id, decode_writing_item).await
    }

    /// Looks up the first record of `source` whose rich-text `property`
    /// equals `key`, then retrieves it by id. Two sequential requests.
    pub async fn try_fetch_single_by_secondary_key(
        &self,
        source: &SourceId,
        property: &str,
        key: &str,
        decode: Decoder<NotionItem>,
    ) -> Result<Option<PostContent>, AppError> {
        let query = DatabaseQuery::new().filter(PropertyFilter::rich_text_equals(property, key));
        let response = self.repo.query_database(source.id(), &query).await?;

        let Some(first) = response.results.into_iter().next() else {
            log::debug!("No record in {} with {} = {:?}", source, property, key);
            return Ok(None);
        };
        let Some(record) = PageRecord::guard(first) else {
            return Ok(None);
        };

        self.try_fetch_single_by_id(&record.id, decode).await
    }

    /// A writing post by its URL slug.
    pub async fn try_writing_post_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<PostContent>, AppError> {
        let source = Self::require(self.sources.writing.as_ref(), "Writing")?;
        self.try_fetch_single_by_secondary_key(source, labels::SLUG, slug, decode_writing_item)
            .await
    }

    pub async fn writing_post_by_slug(&self, slug: &str) -> Option<PostContent> {
        self.try_writing_post_by_slug(slug)
            .await
            .unwrap_or_else(|e| {
                log::error!("Error fetching writing post content for slug {}: {}", slug, e);
                None
            })
    }
}

/// Page size to use when a caller passes none, zero, or an unparsable one.
pub fn page_size_or_default(requested: Option<&str>) -> u32 {
    requested
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}
