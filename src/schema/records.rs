// src/schema/records.rs
//! Per-database property schemas, keyed by the labels used in Notion.

use super::lenient;
use super::properties::{DateProperty, RichTextProperty, SelectProperty, TitleProperty, UrlProperty};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Property labels as they appear in the Notion databases.
pub mod labels {
    pub const NAME: &str = "Name";
    pub const CATEGORY: &str = "Category";
    pub const STATUS: &str = "Status";
    pub const PUBLISHED: &str = "Published";
    pub const SOURCE: &str = "Source";
    pub const SLUG: &str = "Slug";
    pub const URL: &str = "URL";
    pub const EXCERPT: &str = "Excerpt";
    pub const FEATURE_IMAGE: &str = "FeatureImage";
    pub const ARTIST: &str = "Artist";
    pub const ALBUM: &str = "Album";
    pub const SPOTIFY_URL: &str = "Spotify URL";
    pub const PLAYED_AT: &str = "Played At";
}

/// A fixed-shape reading of a record's property bag.
pub trait PropertySchema: DeserializeOwned + Default {
    /// Reads the known labels out of `properties`. Never fails: unknown
    /// labels are ignored and unreadable ones are left unset.
    fn from_properties(properties: &Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(properties.clone())).unwrap_or_default()
    }
}

/// The blog's "Writing" database.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WritingSchema {
    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<TitleProperty>,
    #[serde(rename = "Published", default, deserialize_with = "lenient")]
    pub published: Option<DateProperty>,
    #[serde(rename = "URL", default, deserialize_with = "lenient")]
    pub url: Option<UrlProperty>,
    #[serde(rename = "Slug", default, deserialize_with = "lenient")]
    pub slug: Option<RichTextProperty>,
    #[serde(rename = "Excerpt", default, deserialize_with = "lenient")]
    pub excerpt: Option<RichTextProperty>,
    #[serde(rename = "FeatureImage", default, deserialize_with = "lenient")]
    pub feature_image: Option<UrlProperty>,
}

impl PropertySchema for WritingSchema {}

/// Any other content database (projects, notes) sharing the generic layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentSchema {
    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<TitleProperty>,
    #[serde(rename = "Category", default, deserialize_with = "lenient")]
    pub category: Option<SelectProperty>,
    #[serde(rename = "Status", default, deserialize_with = "lenient")]
    pub status: Option<SelectProperty>,
    #[serde(rename = "Published", default, deserialize_with = "lenient")]
    pub published: Option<DateProperty>,
    #[serde(rename = "Source", default, deserialize_with = "lenient")]
    pub source: Option<UrlProperty>,
    #[serde(rename = "Slug", default, deserialize_with = "lenient")]
    pub slug: Option<RichTextProperty>,
}

impl PropertySchema for ContentSchema {}

/// The listening-history database filled by the Spotify sync.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MusicSchema {
    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<TitleProperty>,
    #[serde(rename = "Artist", default, deserialize_with = "lenient")]
    pub artist: Option<RichTextProperty>,
    #[serde(rename = "Album", default, deserialize_with = "lenient")]
    pub album: Option<RichTextProperty>,
    #[serde(rename = "Spotify URL", default, deserialize_with = "lenient")]
    pub spotify_url: Option<UrlProperty>,
    #[serde(rename = "Played At", default, deserialize_with = "lenient")]
    pub played_at: Option<DateProperty>,
}

impl PropertySchema for MusicSchema {}
