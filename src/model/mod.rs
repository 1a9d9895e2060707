// src/model/mod.rs
//! Normalized view types handed to page handlers and HTTP clients.
//!
//! These are immutable values built fresh on every query. Field names are
//! serialized in camelCase, the shape the site's frontend consumes.

mod blocks;

pub use blocks::ProcessedBlock;

use serde::{Deserialize, Serialize};

/// A content record: blog post, project, note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionItem {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: String,
    pub created_time: String,
    pub published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_image: Option<String>,
}

/// One play from the listening-history database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionListeningHistoryItem {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub played_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One page of normalized items plus the cursor for the next one.
///
/// `next_cursor` is only meaningful when repeating the same filter and sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> ItemPage<T> {
    /// The page returned when nothing could be read.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

impl<T> Default for ItemPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A single post: its metadata and its rendered body blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostContent {
    pub metadata: NotionItem,
    pub blocks: Vec<ProcessedBlock>,
}
