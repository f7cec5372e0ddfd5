//! Library Client (spec §4.1): typed, retry-tolerant access to the remote
//! Library Server's HTTP API.

pub mod mock;
pub mod reqwest_client;

pub use mock::MockLibraryClient;
pub use reqwest_client::ReqwestLibraryClient;

use crate::core::config::{AlbumId, ArtistId, TrackId};
use crate::core::errors::FetchError;
use crate::domain::{Album, Artist, Track};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Any entity the Library Server can hand back for a bare id lookup.
#[derive(Debug, Clone)]
pub enum LibraryItem {
    Track(Track),
    Album(Album),
    Artist(Artist),
}

impl LibraryItem {
    pub fn into_track(self) -> Option<Track> {
        match self {
            LibraryItem::Track(t) => Some(t),
            _ => None,
        }
    }
}

/// One `history(since)` entry (spec §4.1).
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub rating_key: TrackId,
    pub viewed_at: DateTime<Utc>,
}

/// Typed, async access to the Library Server. Implementations must never
/// retry automatically — callers decide whether a missing item is fatal
/// (spec §4.1).
#[async_trait]
pub trait LibraryClient: Send + Sync {
    async fn fetch_item(&self, id: &str) -> Result<LibraryItem, FetchError>;

    async fn list_artists(&self) -> Result<Vec<Artist>, FetchError>;
    async fn list_albums_for_artist(&self, artist: &ArtistId) -> Result<Vec<Album>, FetchError>;
    async fn list_tracks_for_album(&self, album: &AlbumId) -> Result<Vec<Track>, FetchError>;
    async fn list_tracks_for_artist(&self, artist: &ArtistId) -> Result<Vec<Track>, FetchError>;

    async fn search_tracks(&self, genre: &str, limit: usize) -> Result<Vec<Track>, FetchError>;
    async fn search_albums(&self, genre: &str, limit: usize) -> Result<Vec<Album>, FetchError>;
    async fn search_artists_by_name(&self, name: &str) -> Result<Vec<Artist>, FetchError>;

    /// Listening history scoped to the music section, since the given instant.
    async fn history(&self, since: DateTime<Utc>) -> Result<Vec<HistoryEntry>, FetchError>;

    async fn sonic_similar_albums(
        &self,
        album: &AlbumId,
        limit: usize,
    ) -> Result<Vec<Album>, FetchError>;
    async fn sonic_similar_artists(
        &self,
        artist: &ArtistId,
        limit: usize,
    ) -> Result<Vec<Artist>, FetchError>;
    /// Two-path implementation in the real client: a preferred
    /// "related/sonic" endpoint, falling back to "nearest?context=sonicallySimilar".
    async fn sonic_similar_tracks(
        &self,
        track: &TrackId,
        limit: usize,
    ) -> Result<Vec<Track>, FetchError>;

    async fn list_playlists(&self) -> Result<Vec<String>, FetchError>;
    async fn playlist_items(&self, name: &str) -> Result<Vec<Track>, FetchError>;

    /// Resolves a named collection tag to the items it covers (artists,
    /// albums, tracks, in whatever mix the server tags that way).
    async fn items_in_collection(&self, name: &str) -> Result<Vec<LibraryItem>, FetchError>;

    async fn create_playlist(&self, name: &str, tracks: &[Track]) -> Result<(), FetchError>;
    async fn replace_playlist_items(&self, name: &str, tracks: &[Track]) -> Result<(), FetchError>;
    async fn set_playlist_summary(&self, name: &str, summary: &str) -> Result<(), FetchError>;
    async fn upload_playlist_poster(
        &self,
        name: &str,
        image_path: &std::path::Path,
    ) -> Result<(), FetchError>;

    /// Verifies the server is reachable and the configured music section
    /// exists. Fatal (spec §4.9) if it returns an error.
    async fn check_connection(&self) -> Result<(), String>;
}
