use serde::{Deserialize, Serialize};

/// A page body block, reduced to what the site renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    /// Plain text of the block's rich text, concatenated.
    pub text: String,
    /// Target of media, file, bookmark and embed blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProcessedBlock>,
}
