//! Artist entity (spec §3).

use crate::core::config::ArtistId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub collections: HashSet<String>,
    pub genres: HashSet<String>,
    pub user_rating: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtist {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,
    pub title: String,
    #[serde(rename = "Collection", default)]
    pub collection: Vec<super::track::RawTag>,
    #[serde(rename = "Genre", default)]
    pub genre: Vec<super::track::RawTag>,
    #[serde(rename = "userRating", default)]
    pub user_rating: Option<f32>,
}

impl From<RawArtist> for Artist {
    fn from(raw: RawArtist) -> Self {
        Artist {
            id: ArtistId(raw.rating_key),
            name: raw.title,
            collections: raw.collection.into_iter().map(|t| t.tag).collect(),
            genres: raw.genre.into_iter().map(|t| t.tag).collect(),
            user_rating: raw.user_rating,
        }
    }
}
