// src/spotify/auth.rs
//! Authorization-code OAuth with a file-backed token cache.

use super::{service_error, SpotifyConfig};
use crate::error::AppError;
use crate::types::ValidationError;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SCOPE: &str = "user-read-recently-played";

/// Tokens as persisted between runs. `expires_at` is seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: f64,
}

impl StoredTokens {
    fn issued_now(access_token: String, refresh_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: now_seconds() + expires_in as f64,
        }
    }

    pub fn is_valid_at(&self, now: f64) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: u64,
}

fn now_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// JSON token file. A missing or unreadable file reads as "no tokens".
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Option<StoredTokens> {
        let content = tokio::fs::read_to_string(&self.path).await.ok()?;
        match serde_json::from_str(&content) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                log::warn!("Ignoring unreadable token cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub async fn save(&self, tokens: &StoredTokens) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(tokens)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// URL the user visits to grant the app access to their listening history.
pub fn authorization_url(config: &SpotifyConfig) -> Result<String, ValidationError> {
    Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", SCOPE),
        ],
    )
    .map(String::from)
    .map_err(|e| ValidationError::InvalidUrl {
        url: AUTHORIZE_URL.to_string(),
        reason: e.to_string(),
    })
}

/// Produces a valid access token: cached, refreshed, or freshly authorized.
pub struct SpotifyAuth {
    http: Client,
    config: SpotifyConfig,
    cache: TokenCache,
}

impl SpotifyAuth {
    pub fn new(http: Client, config: SpotifyConfig, cache: TokenCache) -> Self {
        Self {
            http,
            config,
            cache,
        }
    }

    /// Returns an access token, refreshing or authorizing as needed.
    ///
    /// `prompt_for_code` is only called when no tokens are cached; it receives
    /// the authorization URL and returns the code from the redirect.
    pub async fn access_token<F>(&self, prompt_for_code: F) -> Result<String, AppError>
    where
        F: FnOnce(&str) -> Result<String, AppError>,
    {
        if let Some(stored) = self.cache.load().await {
            if stored.is_valid_at(now_seconds()) {
                log::debug!("Using cached Spotify access token");
                return Ok(stored.access_token);
            }

            log::info!("Refreshing Spotify access token");
            let response = self
                .request_tokens(&[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", stored.refresh_token.as_str()),
                ])
                .await?;
            let tokens = StoredTokens::issued_now(
                response.access_token,
                response.refresh_token.unwrap_or(stored.refresh_token),
                response.expires_in,
            );
            self.cache.save(&tokens).await?;
            return Ok(tokens.access_token);
        }

        let url = authorization_url(&self.config)?;
        let code = prompt_for_code(&url)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::EmptyField("authorization code").into());
        }

        let response = self
            .request_tokens(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;
        let refresh_token = response.refresh_token.ok_or_else(|| {
            AppError::MalformedResponse("token response has no refresh_token".to_string())
        })?;
        let tokens =
            StoredTokens::issued_now(response.access_token, refresh_token, response.expires_in);
        self.cache.save(&tokens).await?;
        log::info!("Spotify authorization saved to {}", self.cache.path().display());
        Ok(tokens.access_token)
    }

    async fn request_tokens(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(service_error(TOKEN_URL, response).await);
        }
        Ok(response.json().await?)
    }
}
