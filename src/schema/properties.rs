// src/schema/properties.rs
//! Typed views of the individual Notion property values the site uses.

use serde::{Deserialize, Serialize};

/// The only part of a rich text item the site reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlainText {
    #[serde(default)]
    pub plain_text: String,
}

/// Text of the first fragment, if non-empty. Later fragments are ignored.
fn first_fragment(fragments: &[PlainText]) -> Option<&str> {
    fragments
        .first()
        .map(|fragment| fragment.plain_text.as_str())
        .filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleProperty {
    #[serde(default)]
    pub title: Vec<PlainText>,
}

impl TitleProperty {
    pub fn text(&self) -> Option<&str> {
        first_fragment(&self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextProperty {
    #[serde(default)]
    pub rich_text: Vec<PlainText>,
}

impl RichTextProperty {
    pub fn text(&self) -> Option<&str> {
        first_fragment(&self.rich_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectProperty {
    #[serde(default)]
    pub select: Option<SelectOption>,
}

impl SelectProperty {
    pub fn name(&self) -> Option<&str> {
        self.select
            .as_ref()
            .map(|option| option.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateProperty {
    #[serde(default)]
    pub date: Option<DateRange>,
}

impl DateProperty {
    pub fn start(&self) -> Option<&str> {
        self.date
            .as_ref()
            .map(|range| range.start.as_str())
            .filter(|start| !start.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlProperty {
    #[serde(default)]
    pub url: Option<String>,
}

impl UrlProperty {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_the_first_fragment_is_read() {
        let title: TitleProperty = serde_json::from_value(json!({
            "id": "title",
            "type": "title",
            "title": [{"plain_text": "Hello"}, {"plain_text": " world"}]
        }))
        .unwrap();
        assert_eq!(title.text(), Some("Hello"));
    }

    #[test]
    fn empty_values_read_as_absent() {
        let title: TitleProperty = serde_json::from_value(json!({"title": []})).unwrap();
        assert_eq!(title.text(), None);

        let text: RichTextProperty =
            serde_json::from_value(json!({"rich_text": [{"plain_text": ""}]})).unwrap();
        assert_eq!(text.text(), None);

        let select: SelectProperty = serde_json::from_value(json!({"select": null})).unwrap();
        assert_eq!(select.name(), None);

        let date: DateProperty = serde_json::from_value(json!({"date": null})).unwrap();
        assert_eq!(date.start(), None);
    }

    #[test]
    fn date_reads_start() {
        let date: DateProperty = serde_json::from_value(json!({
            "type": "date",
            "date": {"start": "2024-03-01", "end": null, "time_zone": null}
        }))
        .unwrap();
        assert_eq!(date.start(), Some("2024-03-01"));
    }
}
