use crate::schema::PropertySchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Page icon. Only file and external icons resolve to an image URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { external: FileUrl },
    File { file: FileUrl },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

impl Icon {
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Icon::External { external } => Some(external.url.as_str()),
            Icon::File { file } => Some(file.url.as_str()),
            Icon::Emoji { .. } | Icon::Other => None,
        }
    }
}

#[derive(Deserialize)]
struct RawRecord {
    id: String,
    #[serde(default)]
    created_time: Option<String>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "crate::schema::lenient")]
    icon: Option<Icon>,
}

/// A raw record that passed the property-bag guard.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub id: String,
    pub created_time: String,
    pub properties: Map<String, Value>,
    pub icon: Option<Icon>,
}

impl PageRecord {
    /// Accepts `raw` only if it is a record with an id and a non-empty
    /// property bag.
    pub fn guard(raw: Value) -> Option<Self> {
        let record: RawRecord = serde_json::from_value(raw).ok()?;
        let properties = record.properties.filter(|bag| !bag.is_empty())?;

        Some(Self {
            id: record.id,
            created_time: record.created_time.unwrap_or_default(),
            properties,
            icon: record.icon,
        })
    }

    /// Reads the property bag through a fixed schema.
    pub fn schema<S: PropertySchema>(&self) -> S {
        S::from_properties(&self.properties)
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon.as_ref().and_then(Icon::image_url)
    }
}
