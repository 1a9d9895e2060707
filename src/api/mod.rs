// src/api/mod.rs
//! Notion API interaction: reading records from the workspace databases.
//!
//! Records come back as raw JSON; shape checks and normalization happen in
//! `decode`, never here.

pub mod client;
pub mod pagination;
pub mod parser;
pub mod query;
pub mod types;

use crate::error::AppError;
use crate::types::NotionId;
use serde_json::Value;

pub use client::NotionHttpClient;
pub use query::{DatabaseQuery, PropertyFilter, PropertySort, SortDirection};
pub use types::PaginatedResponse;

/// The ability to read (and, for the sync job, append to) a Notion workspace.
///
/// Query code depends on this trait, never on HTTP details. One instance is
/// built at startup and shared.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Runs one database query and returns one page of raw records.
    async fn query_database(
        &self,
        database: &NotionId,
        query: &DatabaseQuery,
    ) -> Result<PaginatedResponse<Value>, AppError>;

    /// Retrieves one page record by id.
    async fn retrieve_page(&self, id: &NotionId) -> Result<Value, AppError>;

    /// Retrieves one page of a block's children.
    async fn retrieve_children(
        &self,
        parent: &NotionId,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<PaginatedResponse<Value>, AppError>;

    /// Creates a page and returns the created record.
    async fn create_page(&self, body: &Value) -> Result<Value, AppError>;
}
