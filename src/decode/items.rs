use super::PageRecord;
use crate::constants::{
    DRAFT_STATUS, PUBLISHED_STATUS, UNCATEGORIZED, UNTITLED, WRITING_CATEGORY,
};
use crate::model::{NotionItem, NotionListeningHistoryItem};
use crate::schema::{ContentSchema, MusicSchema, WritingSchema};

/// Drops a leading `https://` so sources display as bare hosts and paths.
pub fn strip_https(url: &str) -> String {
    url.strip_prefix("https://").unwrap_or(url).to_string()
}

/// A blog post from the writing database.
pub fn decode_writing_item(record: &PageRecord) -> NotionItem {
    let schema: WritingSchema = record.schema();

    NotionItem {
        id: record.id.clone(),
        title: schema
            .name
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or(UNTITLED)
            .to_string(),
        category: WRITING_CATEGORY.to_string(),
        status: PUBLISHED_STATUS.to_string(),
        created_time: record.created_time.clone(),
        published: schema
            .published
            .as_ref()
            .and_then(|p| p.start())
            .unwrap_or(record.created_time.as_str())
            .to_string(),
        source: schema.url.as_ref().and_then(|p| p.url()).map(strip_https),
        slug: schema
            .slug
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or_default()
            .to_string(),
        excerpt: Some(
            schema
                .excerpt
                .as_ref()
                .and_then(|p| p.text())
                .unwrap_or_default()
                .to_string(),
        ),
        feature_image: schema
            .feature_image
            .as_ref()
            .and_then(|p| p.url())
            .filter(|url| !url.is_empty())
            .map(str::to_string),
    }
}

/// A record from any database using the generic content layout.
pub fn decode_content_item(record: &PageRecord) -> NotionItem {
    let schema: ContentSchema = record.schema();

    NotionItem {
        id: record.id.clone(),
        title: schema
            .name
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or(UNTITLED)
            .to_string(),
        category: schema
            .category
            .as_ref()
            .and_then(|p| p.name())
            .unwrap_or(UNCATEGORIZED)
            .to_string(),
        status: schema
            .status
            .as_ref()
            .and_then(|p| p.name())
            .unwrap_or(DRAFT_STATUS)
            .to_string(),
        created_time: record.created_time.clone(),
        published: schema
            .published
            .as_ref()
            .and_then(|p| p.start())
            .unwrap_or(record.created_time.as_str())
            .to_string(),
        source: schema.source.as_ref().and_then(|p| p.url()).map(strip_https),
        slug: schema
            .slug
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or_default()
            .to_string(),
        excerpt: None,
        feature_image: None,
    }
}

/// A play from the listening-history database.
pub fn decode_listening_item(record: &PageRecord) -> NotionListeningHistoryItem {
    let schema: MusicSchema = record.schema();

    NotionListeningHistoryItem {
        id: record.id.clone(),
        name: schema
            .name
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or(UNTITLED)
            .to_string(),
        artist: schema
            .artist
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or_default()
            .to_string(),
        album: schema
            .album
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or_default()
            .to_string(),
        url: schema
            .spotify_url
            .as_ref()
            .and_then(|p| p.url())
            .filter(|url| !url.is_empty())
            .map(str::to_string),
        played_at: schema
            .played_at
            .as_ref()
            .and_then(|p| p.start())
            .unwrap_or(record.created_time.as_str())
            .to_string(),
        image: record.icon_url().map(str::to_string),
    }
}
