// src/lib.rs
//! portfolio-notion library: the content layer of a personal site backed by
//! Notion databases.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `SiteConfig`, `CommandLineInput`
//! - **View model**: `NotionItem`, `NotionListeningHistoryItem`, `ItemPage`, `PostContent`
//! - **Queries**: `ContentQueries` and the block tree walk
//! - **API client**: `NotionRepository`, `NotionHttpClient`
//! - **Serving**: `build_router`, `serve`
//! - **Spotify sync**: `spotify::sync_listening_history`

pub mod api;
pub mod blocks;
pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod model;
pub mod queries;
pub mod schema;
pub mod server;
pub mod spotify;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Command, CommandLineInput, SiteConfig};

// --- View Model ---
pub use crate::model::{
    ItemPage, NotionItem, NotionListeningHistoryItem, PostContent, ProcessedBlock,
};

// --- Domain Types ---
pub use crate::types::{ApiKey, NotionId, SourceId};

// --- Queries ---
pub use crate::blocks::get_all_blocks;
pub use crate::queries::{ContentQueries, ContentSources};

// --- API Client ---
pub use crate::api::{NotionHttpClient, NotionRepository, PaginatedResponse};

// --- Serving ---
pub use crate::server::{build_router, serve};
