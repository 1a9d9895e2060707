// src/config.rs
use crate::constants::{DEFAULT_PAGE_SIZE, SPOTIFY_RECENT_LIMIT};
use crate::error::AppError;
use crate::queries::ContentSources;
use crate::spotify::SpotifyConfig;
use crate::types::{ApiKey, NotionId, SourceId, ValidationError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

const DEFAULT_REDIRECT_URI: &str = "http://localhost/callback/";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print one page of published writing as JSON
    Writing {
        /// Cursor returned by a previous page
        #[arg(long)]
        cursor: Option<String>,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },

    /// Print one page of listening history as JSON
    Listening {
        #[arg(long)]
        cursor: Option<String>,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },

    /// Print a writing post, looked up by slug
    Post { slug: String },

    /// Print any page (URL or ID) with its block tree
    Page { id: String },

    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },

    /// Append new Spotify plays to the listening-history database
    SyncSpotify {
        /// Where OAuth tokens are kept between runs
        #[arg(long, default_value = "spotify_tokens.json")]
        token_cache: PathBuf,

        #[arg(long, default_value_t = SPOTIFY_RECENT_LIMIT)]
        limit: u32,
    },
}

/// Everything the content commands need, read from the environment.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub api_key: ApiKey,
    pub sources: ContentSources,
}

impl SiteConfig {
    pub fn resolve() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `NOTION_TOKEN` wins over `NOTION_API_KEY`. Database ids are optional;
    /// queries against a missing one fail when issued.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = non_empty(&lookup, "NOTION_TOKEN")
            .or_else(|| non_empty(&lookup, "NOTION_API_KEY"))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "NOTION_TOKEN environment variable not set".to_string(),
                )
            })?;
        let api_key = ApiKey::new(token)?;

        let source = |var: &str, label: &'static str| -> Result<Option<SourceId>, AppError> {
            match non_empty(&lookup, var) {
                Some(raw) => Ok(Some(SourceId::new(label, NotionId::parse(&raw)?))),
                None => {
                    log::debug!("{} not set", var);
                    Ok(None)
                }
            }
        };

        Ok(Self {
            api_key,
            sources: ContentSources {
                writing: source("NOTION_WRITING_DATABASE_ID", "writing")?,
                listening: source("NOTION_MUSIC_DATABASE_ID", "listening")?,
            },
        })
    }
}

impl SpotifyConfig {
    pub fn resolve() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            non_empty(&lookup, var).ok_or_else(|| {
                AppError::MissingConfiguration(format!("{} environment variable not set", var))
            })
        };
        let client_id = required("SPOTIFY_CLIENT_ID")?;
        let client_secret = required("SPOTIFY_CLIENT_SECRET")?;

        let redirect_uri = non_empty(&lookup, "SPOTIFY_REDIRECT_URI")
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());
        Url::parse(&redirect_uri).map_err(|e| ValidationError::InvalidUrl {
            url: redirect_uri.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TOKEN: &str = "secret_abcdefghijklmnopqrstuvwxyz";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn site_config_reads_token_and_databases() {
        let config = SiteConfig::from_lookup(env(&[
            ("NOTION_TOKEN", TOKEN),
            ("NOTION_WRITING_DATABASE_ID", "550e8400-e29b-41d4-a716-446655440000"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_str(), TOKEN);
        let writing = config.sources.writing.unwrap();
        assert_eq!(writing.label(), "writing");
        assert_eq!(writing.id().as_str(), "550e8400e29b41d4a716446655440000");
        assert!(config.sources.listening.is_none());
    }

    #[test]
    fn legacy_token_variable_is_accepted() {
        let config = SiteConfig::from_lookup(env(&[("NOTION_API_KEY", TOKEN)])).unwrap();
        assert_eq!(config.api_key.as_str(), TOKEN);
    }

    #[test]
    fn missing_token_is_reported() {
        let err = SiteConfig::from_lookup(env(&[("NOTION_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));
    }

    #[test]
    fn malformed_database_id_is_rejected() {
        let err = SiteConfig::from_lookup(env(&[
            ("NOTION_TOKEN", TOKEN),
            ("NOTION_MUSIC_DATABASE_ID", "not-an-id"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn spotify_config_defaults_redirect() {
        let config = SpotifyConfig::from_lookup(env(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);

        let err = SpotifyConfig::from_lookup(env(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SPOTIFY_REDIRECT_URI", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        assert!(SpotifyConfig::from_lookup(env(&[("SPOTIFY_CLIENT_ID", "id")])).is_err());
    }

    #[test]
    fn subcommands_parse() {
        let cli = CommandLineInput::parse_from(["portfolio-notion", "-v", "listening", "--limit", "5"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Command::Listening {
                cursor: None,
                limit: 5
            }
        );

        let cli = CommandLineInput::parse_from(["portfolio-notion", "sync-spotify"]);
        assert_eq!(
            cli.command,
            Command::SyncSpotify {
                token_cache: PathBuf::from("spotify_tokens.json"),
                limit: 50
            }
        );
    }
}
