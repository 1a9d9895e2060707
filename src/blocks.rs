// src/blocks.rs
//! Page body retrieval: walks a page's block tree and normalizes each block.

use crate::api::pagination::fetch_all_pages;
use crate::api::NotionRepository;
use crate::constants::BLOCK_MAX_FETCH_DEPTH;
use crate::decode::FileUrl;
use crate::error::AppError;
use crate::model::ProcessedBlock;
use crate::schema::{lenient, PlainText};
use crate::types::NotionId;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

type BlockFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<ProcessedBlock>, AppError>> + Send + 'a>>;

/// Retrieves and normalizes every block under `page_id`, nested children
/// included down to [`BLOCK_MAX_FETCH_DEPTH`].
///
/// Failure to list the page's own children is an error. Failure below that
/// only empties the affected block's children.
pub async fn get_all_blocks(
    repo: &dyn NotionRepository,
    page_id: &NotionId,
) -> Result<Vec<ProcessedBlock>, AppError> {
    fetch_level(repo, page_id.clone(), 0).await
}

fn fetch_level(repo: &dyn NotionRepository, parent: NotionId, depth: u8) -> BlockFuture<'_> {
    Box::pin(async move {
        let raw_blocks = fetch_all_pages(
            |page_size, cursor| {
                let parent = parent.clone();
                async move {
                    repo.retrieve_children(&parent, cursor.as_deref(), page_size)
                        .await
                }
            },
            None,
        )
        .await?;

        let mut blocks = Vec::with_capacity(raw_blocks.len());
        for raw in raw_blocks {
            let Some((mut block, has_children)) = process_block(raw) else {
                continue;
            };

            if has_children && depth + 1 < BLOCK_MAX_FETCH_DEPTH {
                match NotionId::parse(&block.id) {
                    Ok(child_id) => match fetch_level(repo, child_id, depth + 1).await {
                        Ok(children) => block.children = children,
                        Err(e) => log::warn!("Skipping children of block {}: {}", block.id, e),
                    },
                    Err(e) => log::warn!("Block {} has an unusable id: {}", block.id, e),
                }
            }

            blocks.push(block);
        }
        Ok(blocks)
    })
}

#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

/// The type-specific payload fields the site renders.
#[derive(Default, Deserialize)]
struct BlockContent {
    #[serde(default, deserialize_with = "lenient")]
    rich_text: Option<Vec<PlainText>>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    external: Option<FileUrl>,
    #[serde(default, deserialize_with = "lenient")]
    file: Option<FileUrl>,
    #[serde(default, deserialize_with = "lenient")]
    language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    checked: Option<bool>,
}

/// Normalizes one raw block. Returns the block and whether the store says
/// it has children, or `None` if the raw value is not a block.
pub fn process_block(raw: Value) -> Option<(ProcessedBlock, bool)> {
    let RawBlock {
        id,
        block_type,
        has_children,
        mut payload,
    } = serde_json::from_value(raw).ok()?;

    let content: BlockContent = payload
        .remove(&block_type)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    let text = match (&content.rich_text, &content.title) {
        (Some(fragments), _) => fragments
            .iter()
            .map(|fragment| fragment.plain_text.as_str())
            .collect(),
        (None, Some(title)) => title.clone(),
        (None, None) => String::new(),
    };

    let url = content
        .url
        .or_else(|| content.external.map(|f| f.url))
        .or_else(|| content.file.map(|f| f.url));

    Some((
        ProcessedBlock {
            id,
            block_type,
            text,
            url,
            language: content.language,
            checked: content.checked,
            children: Vec::new(),
        },
        has_children,
    ))
}
