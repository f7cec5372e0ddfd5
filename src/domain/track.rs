//! Track entity (spec §3) and its Library Server wire format.

use crate::core::config::{AlbumId, ArtistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single track, as used throughout the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub album_id: Option<AlbumId>,
    pub artist_id: Option<ArtistId>,
    pub artist_name: String,
    pub track_index: Option<u32>,
    pub disc_index: Option<u32>,
    pub duration_ms: u64,
    pub added_at: DateTime<Utc>,
    pub user_rating: Option<f32>,
    pub play_count: u64,
    pub rating_count: u64,
    pub year: Option<u32>,
    pub genres: Vec<String>,
    /// Collection tag names attached directly to the track.
    pub collections: Vec<String>,
}

impl Track {
    pub fn duration_sec(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// Raw wire shape returned by the Library Server for a track `Metadata` entry.
/// Field names follow the Plex-family API the original script talks to.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrack {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,
    pub title: String,
    #[serde(rename = "parentRatingKey")]
    pub parent_rating_key: Option<String>,
    #[serde(rename = "grandparentRatingKey")]
    pub grandparent_rating_key: Option<String>,
    #[serde(rename = "grandparentTitle", default)]
    pub grandparent_title: String,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(rename = "parentIndex", default)]
    pub parent_index: Option<u32>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(rename = "addedAt", default)]
    pub added_at: Option<i64>,
    #[serde(rename = "userRating", default)]
    pub user_rating: Option<f32>,
    #[serde(rename = "viewCount", default)]
    pub view_count: Option<u64>,
    #[serde(rename = "ratingCount", default)]
    pub rating_count: Option<u64>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(rename = "Genre", default)]
    pub genre: Vec<RawTag>,
    #[serde(rename = "Collection", default)]
    pub collection: Vec<RawTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTag {
    pub tag: String,
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        let added_at = raw
            .added_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);
        Track {
            id: TrackId(raw.rating_key),
            title: raw.title,
            album_id: raw.parent_rating_key.map(AlbumId),
            artist_id: raw.grandparent_rating_key.map(ArtistId),
            artist_name: raw.grandparent_title,
            track_index: raw.index,
            disc_index: raw.parent_index,
            duration_ms: raw.duration.unwrap_or(0),
            added_at,
            user_rating: raw.user_rating,
            play_count: raw.view_count.unwrap_or(0),
            rating_count: raw.rating_count.unwrap_or(0),
            year: raw.year,
            genres: raw.genre.into_iter().map(|t| t.tag).collect(),
            collections: raw.collection.into_iter().map(|t| t.tag).collect(),
        }
    }
}
