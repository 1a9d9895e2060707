// src/decode/mod.rs
//! Guarded decode of raw Notion records into normalized items.
//!
//! Two steps. The guard accepts a raw record only if it carries a non-empty
//! property bag; anything else is dropped. Extraction then reads the known
//! labels through a [`PropertySchema`] and fills every gap with a default, so
//! it cannot fail.

mod items;
mod record;

pub use items::{decode_content_item, decode_listening_item, decode_writing_item, strip_https};
pub use record::{FileUrl, Icon, PageRecord};

use serde_json::Value;

/// Maps a guarded record to one normalized item.
pub type Decoder<T> = fn(&PageRecord) -> T;

/// Guards and decodes a page of raw records, preserving store order.
///
/// Records without a property bag are skipped, so the result may be shorter
/// than `results`.
pub fn decode_records<T>(results: Vec<Value>, decode: Decoder<T>) -> Vec<T> {
    let raw_count = results.len();
    let items: Vec<T> = results
        .into_iter()
        .filter_map(PageRecord::guard)
        .map(|record| decode(&record))
        .collect();

    if items.len() < raw_count {
        log::debug!(
            "Dropped {} of {} records without a property bag",
            raw_count - items.len(),
            raw_count
        );
    }
    items
}
