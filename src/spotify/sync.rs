// src/spotify/sync.rs
//! Incremental append of Spotify plays to the listening-history database.

use super::client::PlayHistoryItem;
use crate::api::{DatabaseQuery, NotionRepository, PropertySort};
use crate::constants::SYNC_BUFFER_MINUTES;
use crate::decode::PageRecord;
use crate::error::AppError;
use crate::schema::{labels, MusicSchema};
use crate::types::{NotionId, SourceId};
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeDelta, Utc};
use serde_json::{json, Value};

/// One play, shaped for a listening-history row.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub url: Option<String>,
    pub played_at: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub fetched: usize,
    pub added: usize,
}

/// Parses a Notion or Spotify timestamp. Date-only values read as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().fixed_offset())
}

/// The plays in `items` newer than `latest`, in the order Spotify returned
/// them (newest first).
///
/// Walking stops at the first play within the buffer of `latest`; everything
/// after it is already synced.
pub fn select_new_tracks(
    items: &[PlayHistoryItem],
    latest: Option<DateTime<FixedOffset>>,
) -> Vec<TrackRecord> {
    let buffer = TimeDelta::minutes(SYNC_BUFFER_MINUTES);
    let mut selected = Vec::new();

    for item in items {
        let Some(played_at) = parse_timestamp(&item.played_at) else {
            log::warn!(
                "Skipping '{}': unreadable played_at {:?}",
                item.track.name,
                item.played_at
            );
            continue;
        };

        if let Some(latest) = latest {
            if played_at - buffer <= latest {
                log::info!("Reached already-synced tracks at {}", item.played_at);
                break;
            }
        }

        let track = &item.track;
        selected.push(TrackRecord {
            name: track.name.clone(),
            artist: track
                .artists
                .iter()
                .map(|artist| artist.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album: track.album.name.clone(),
            url: track.external_urls.spotify.clone(),
            played_at: played_at
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            image: track.album.images.first().map(|image| image.url.clone()),
        });
    }

    selected
}

fn text(content: &str) -> Value {
    json!([{ "text": { "content": content } }])
}

/// Request body creating one listening-history row.
pub fn listening_page_body(database: &NotionId, track: &TrackRecord) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(labels::NAME.to_string(), json!({ "title": text(&track.name) }));
    properties.insert(
        labels::ARTIST.to_string(),
        json!({ "rich_text": text(&track.artist) }),
    );
    properties.insert(
        labels::ALBUM.to_string(),
        json!({ "rich_text": text(&track.album) }),
    );
    properties.insert(
        labels::PLAYED_AT.to_string(),
        json!({ "date": { "start": track.played_at } }),
    );
    if let Some(url) = &track.url {
        properties.insert(labels::SPOTIFY_URL.to_string(), json!({ "url": url }));
    }

    let mut body = json!({
        "parent": { "database_id": database.to_hyphenated() },
        "properties": properties,
    });
    if let Some(image) = &track.image {
        body["icon"] = json!({ "type": "external", "external": { "url": image } });
    }
    body
}

/// The `Played At` of the newest row, or `None` for an empty database.
///
/// A failed lookup is logged and treated as an empty database, so every
/// fetched play gets appended.
pub async fn latest_played_at(
    repo: &dyn NotionRepository,
    source: &SourceId,
) -> Option<DateTime<FixedOffset>> {
    let query = DatabaseQuery::new()
        .sort(PropertySort::descending(labels::PLAYED_AT))
        .page_size(1);

    let response = match repo.query_database(source.id(), &query).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!(
                "Could not read latest play from {} ({}); syncing all fetched tracks",
                source,
                e
            );
            return None;
        }
    };

    let record = response.results.into_iter().next().and_then(PageRecord::guard)?;
    let schema: MusicSchema = record.schema();
    let start = schema.played_at.as_ref().and_then(|p| p.start())?.to_string();
    parse_timestamp(&start)
}

/// Appends every play newer than the database's latest row.
///
/// Rows are created one at a time in Spotify's order; the first failed
/// creation aborts the sync.
pub async fn sync_listening_history(
    repo: &dyn NotionRepository,
    source: &SourceId,
    plays: &[PlayHistoryItem],
) -> Result<SyncReport, AppError> {
    let latest = latest_played_at(repo, source).await;
    match latest {
        Some(latest) => log::info!("Latest synced play: {}", latest.to_rfc3339()),
        None => log::info!("Latest synced play: none (empty database)"),
    }

    let tracks = select_new_tracks(plays, latest);
    for track in &tracks {
        repo.create_page(&listening_page_body(source.id(), track))
            .await?;
        log::info!("Added: {} by {} ({})", track.name, track.artist, track.played_at);
    }

    Ok(SyncReport {
        fetched: plays.len(),
        added: tracks.len(),
    })
}
