// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Items per listing page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page size used when walking block children; the Notion API maximum.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Maximum nesting depth when recursively retrieving block children.
pub const BLOCK_MAX_FETCH_DEPTH: u8 = 10;

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Normalization defaults
// ---------------------------------------------------------------------------

pub const UNTITLED: &str = "Untitled";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const DRAFT_STATUS: &str = "Draft";
pub const WRITING_CATEGORY: &str = "Writing";
pub const PUBLISHED_STATUS: &str = "Published";

// ---------------------------------------------------------------------------
// HTTP surface
// ---------------------------------------------------------------------------

/// Listening history is synced hourly, so responses are cached for an hour.
pub const LISTING_CACHE_SECONDS: u64 = 3600;

// ---------------------------------------------------------------------------
// Spotify sync
// ---------------------------------------------------------------------------

/// Tracks fetched from Spotify's recently-played endpoint per sync (API max).
pub const SPOTIFY_RECENT_LIMIT: u32 = 50;

/// Slack applied when comparing a play against the newest synced play.
/// Notion stores dates at minute precision.
pub const SYNC_BUFFER_MINUTES: i64 = 1;
