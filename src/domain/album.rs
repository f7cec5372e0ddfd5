//! Album entity (spec §3).

use crate::core::config::{AlbumId, ArtistId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    /// Original release date, `YYYY-MM-DD` as returned by the server.
    pub originally_available_at: Option<String>,
    pub year: Option<u32>,
    pub collections: HashSet<String>,
    pub genres: HashSet<String>,
    pub user_rating: Option<f32>,
}

impl Album {
    /// Year is derived from the release date or the explicit `year` field
    /// (spec §3, Album invariant).
    pub fn effective_year(&self) -> Option<u32> {
        self.year.or_else(|| {
            self.originally_available_at
                .as_ref()
                .and_then(|d| d.split('-').next())
                .and_then(|y| y.parse().ok())
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAlbum {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,
    pub title: String,
    #[serde(rename = "parentRatingKey", default)]
    pub parent_rating_key: Option<String>,
    #[serde(rename = "originallyAvailableAt", default)]
    pub originally_available_at: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(rename = "Collection", default)]
    pub collection: Vec<super::track::RawTag>,
    #[serde(rename = "Genre", default)]
    pub genre: Vec<super::track::RawTag>,
    #[serde(rename = "userRating", default)]
    pub user_rating: Option<f32>,
}

impl From<RawAlbum> for Album {
    fn from(raw: RawAlbum) -> Self {
        Album {
            id: AlbumId(raw.rating_key),
            title: raw.title,
            artist_id: raw.parent_rating_key.map(ArtistId),
            originally_available_at: raw.originally_available_at,
            year: raw.year,
            collections: raw.collection.into_iter().map(|t| t.tag).collect(),
            genres: raw.genre.into_iter().map(|t| t.tag).collect(),
            user_rating: raw.user_rating,
        }
    }
}
