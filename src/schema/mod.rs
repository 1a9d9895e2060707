// src/schema/mod.rs
//! Accepted shapes of the Notion databases this site reads.
//!
//! Every field is optional and every field is decoded on its own: a property
//! that is missing, null, or of an unexpected shape reads as `None` instead of
//! failing the whole record. Defaults are applied later, in `decode`.

mod properties;
mod records;

pub use properties::{
    DateProperty, DateRange, PlainText, RichTextProperty, SelectOption, SelectProperty,
    TitleProperty, UrlProperty,
};
pub use records::{labels, ContentSchema, MusicSchema, PropertySchema, WritingSchema};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserializes one property, swallowing shape mismatches as `None`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
