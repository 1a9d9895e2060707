// src/spotify/client.rs
//! Recently-played endpoint of the Spotify Web API.

use super::service_error;
use crate::error::AppError;
use reqwest::Client;
use serde::Deserialize;

const RECENTLY_PLAYED_URL: &str = "https://api.spotify.com/v1/me/player/recently-played";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayHistoryItem {
    pub track: Track,
    pub played_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Album,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Deserialize)]
struct RecentlyPlayed {
    items: Vec<PlayHistoryItem>,
}

#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
}

impl SpotifyClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// The account's most recent plays, newest first.
    pub async fn recently_played(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<PlayHistoryItem>, AppError> {
        let response = self
            .http
            .get(RECENTLY_PLAYED_URL)
            .bearer_auth(access_token)
            .query(&[("limit", limit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(service_error(RECENTLY_PLAYED_URL, response).await);
        }

        let body: RecentlyPlayed = response.json().await?;
        log::debug!("Spotify returned {} recent plays", body.items.len());
        Ok(body.items)
    }
}
