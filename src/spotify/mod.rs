// src/spotify/mod.rs
//! Spotify → Notion listening-history sync.
//!
//! Reads the account's recently played tracks and appends the ones newer
//! than the latest synced play to the listening-history database.

mod auth;
mod client;
mod sync;

pub use auth::{authorization_url, SpotifyAuth, StoredTokens, TokenCache};
pub use client::{Album, Artist, ExternalUrls, Image, PlayHistoryItem, SpotifyClient, Track};
pub use sync::{
    latest_played_at, listening_page_body, parse_timestamp, select_new_tracks,
    sync_listening_history, SyncReport, TrackRecord,
};

/// OAuth application credentials.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Reads the body of a failed Spotify response into an error.
pub(crate) async fn service_error(
    endpoint: &str,
    response: reqwest::Response,
) -> crate::error::AppError {
    let status = response.status();
    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    crate::error::AppError::SpotifyService {
        endpoint: endpoint.to_string(),
        status,
        message,
    }
}
