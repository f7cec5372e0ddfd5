//! In-memory `LibraryClient` fixture used by unit and integration tests.
//! No network is touched; callers populate it with `with_*` builder calls.

use super::{HistoryEntry, LibraryClient, LibraryItem};
use crate::core::config::{AlbumId, ArtistId, TrackId};
use crate::core::errors::FetchError;
use crate::domain::{Album, Artist, Track};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum CollectionMember {
    Track(TrackId),
    Album(AlbumId),
    Artist(ArtistId),
}

#[derive(Default)]
pub struct MockLibraryClient {
    pub tracks: HashMap<TrackId, Track>,
    pub albums: HashMap<AlbumId, Album>,
    pub artists: HashMap<ArtistId, Artist>,

    pub album_tracks: HashMap<AlbumId, Vec<TrackId>>,
    pub artist_tracks: HashMap<ArtistId, Vec<TrackId>>,
    pub artist_albums: HashMap<ArtistId, Vec<AlbumId>>,

    pub genre_tracks: HashMap<String, Vec<TrackId>>,
    pub genre_albums: HashMap<String, Vec<AlbumId>>,
    pub artist_search: HashMap<String, Vec<ArtistId>>,

    pub history_entries: Vec<HistoryEntry>,

    pub sonic_similar_albums: HashMap<AlbumId, Vec<AlbumId>>,
    pub sonic_similar_artists: HashMap<ArtistId, Vec<ArtistId>>,
    pub sonic_similar_tracks: HashMap<TrackId, Vec<TrackId>>,

    pub collections: HashMap<String, Vec<CollectionMember>>,
    pub playlists: Mutex<HashMap<String, Vec<TrackId>>>,
    pub playlist_summaries: Mutex<HashMap<String, String>>,
    pub uploaded_posters: Mutex<Vec<(String, std::path::PathBuf)>>,

    pub connection_ok: bool,
    /// Ids that must fail on `fetch_item`/`sonic_similar_tracks`, to exercise
    /// the "per-item fetch fails, log and skip" path (spec §4.9).
    pub unreachable_ids: std::collections::HashSet<String>,
}

impl MockLibraryClient {
    pub fn new() -> Self {
        Self {
            connection_ok: true,
            ..Default::default()
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.insert(track.id.clone(), track);
        self
    }

    pub fn with_album(mut self, album: Album) -> Self {
        self.albums.insert(album.id.clone(), album);
        self
    }

    pub fn with_artist(mut self, artist: Artist) -> Self {
        self.artists.insert(artist.id.clone(), artist);
        self
    }

    pub fn with_album_tracks(mut self, album: AlbumId, tracks: Vec<TrackId>) -> Self {
        self.album_tracks.insert(album, tracks);
        self
    }

    pub fn with_artist_tracks(mut self, artist: ArtistId, tracks: Vec<TrackId>) -> Self {
        self.artist_tracks.insert(artist, tracks);
        self
    }

    pub fn with_artist_albums(mut self, artist: ArtistId, albums: Vec<AlbumId>) -> Self {
        self.artist_albums.insert(artist, albums);
        self
    }

    pub fn with_genre_tracks(mut self, genre: &str, tracks: Vec<TrackId>) -> Self {
        self.genre_tracks.insert(genre.to_lowercase(), tracks);
        self
    }

    pub fn with_genre_albums(mut self, genre: &str, albums: Vec<AlbumId>) -> Self {
        self.genre_albums.insert(genre.to_lowercase(), albums);
        self
    }

    pub fn with_artist_search(mut self, name: &str, artists: Vec<ArtistId>) -> Self {
        self.artist_search.insert(name.to_string(), artists);
        self
    }

    pub fn with_history(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.history_entries = entries;
        self
    }

    pub fn with_sonic_similar_albums(mut self, album: AlbumId, similar: Vec<AlbumId>) -> Self {
        self.sonic_similar_albums.insert(album, similar);
        self
    }

    pub fn with_sonic_similar_artists(mut self, artist: ArtistId, similar: Vec<ArtistId>) -> Self {
        self.sonic_similar_artists.insert(artist, similar);
        self
    }

    pub fn with_sonic_similar_tracks(mut self, track: TrackId, similar: Vec<TrackId>) -> Self {
        self.sonic_similar_tracks.insert(track, similar);
        self
    }

    pub fn with_collection(mut self, name: &str, members: Vec<CollectionMember>) -> Self {
        self.collections.insert(name.to_string(), members);
        self
    }

    pub fn with_playlist(self, name: &str, tracks: Vec<TrackId>) -> Self {
        self.playlists.lock().unwrap().insert(name.to_string(), tracks);
        self
    }

    pub fn connection_failing(mut self) -> Self {
        self.connection_ok = false;
        self
    }

    fn resolve(&self, ids: &[TrackId]) -> Vec<Track> {
        ids.iter().filter_map(|id| self.tracks.get(id).cloned()).collect()
    }
}

#[async_trait]
impl LibraryClient for MockLibraryClient {
    async fn fetch_item(&self, id: &str) -> Result<LibraryItem, FetchError> {
        if self.unreachable_ids.contains(id) {
            return Err(FetchError::new(id, "simulated fetch failure"));
        }
        if let Some(t) = self.tracks.get(&TrackId(id.to_string())) {
            return Ok(LibraryItem::Track(t.clone()));
        }
        if let Some(a) = self.albums.get(&AlbumId(id.to_string())) {
            return Ok(LibraryItem::Album(a.clone()));
        }
        if let Some(a) = self.artists.get(&ArtistId(id.to_string())) {
            return Ok(LibraryItem::Artist(a.clone()));
        }
        Err(FetchError::new(id, "not found"))
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, FetchError> {
        Ok(self.artists.values().cloned().collect())
    }

    async fn list_albums_for_artist(&self, artist: &ArtistId) -> Result<Vec<Album>, FetchError> {
        Ok(self
            .artist_albums
            .get(artist)
            .into_iter()
            .flatten()
            .filter_map(|id| self.albums.get(id).cloned())
            .collect())
    }

    async fn list_tracks_for_album(&self, album: &AlbumId) -> Result<Vec<Track>, FetchError> {
        Ok(self
            .album_tracks
            .get(album)
            .map(|ids| self.resolve(ids))
            .unwrap_or_default())
    }

    async fn list_tracks_for_artist(&self, artist: &ArtistId) -> Result<Vec<Track>, FetchError> {
        Ok(self
            .artist_tracks
            .get(artist)
            .map(|ids| self.resolve(ids))
            .unwrap_or_default())
    }

    async fn search_tracks(&self, genre: &str, _limit: usize) -> Result<Vec<Track>, FetchError> {
        Ok(self
            .genre_tracks
            .get(&genre.to_lowercase())
            .map(|ids| self.resolve(ids))
            .unwrap_or_default())
    }

    async fn search_albums(&self, genre: &str, _limit: usize) -> Result<Vec<Album>, FetchError> {
        Ok(self
            .genre_albums
            .get(&genre.to_lowercase())
            .into_iter()
            .flatten()
            .filter_map(|id| self.albums.get(id).cloned())
            .collect())
    }

    async fn search_artists_by_name(&self, name: &str) -> Result<Vec<Artist>, FetchError> {
        Ok(self
            .artist_search
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.artists.get(id).cloned())
            .collect())
    }

    async fn history(&self, since: DateTime<Utc>) -> Result<Vec<HistoryEntry>, FetchError> {
        Ok(self
            .history_entries
            .iter()
            .filter(|e| e.viewed_at >= since)
            .cloned()
            .collect())
    }

    async fn sonic_similar_albums(
        &self,
        album: &AlbumId,
        limit: usize,
    ) -> Result<Vec<Album>, FetchError> {
        Ok(self
            .sonic_similar_albums
            .get(album)
            .into_iter()
            .flatten()
            .take(limit)
            .filter_map(|id| self.albums.get(id).cloned())
            .collect())
    }

    async fn sonic_similar_artists(
        &self,
        artist: &ArtistId,
        limit: usize,
    ) -> Result<Vec<Artist>, FetchError> {
        Ok(self
            .sonic_similar_artists
            .get(artist)
            .into_iter()
            .flatten()
            .take(limit)
            .filter_map(|id| self.artists.get(id).cloned())
            .collect())
    }

    async fn sonic_similar_tracks(
        &self,
        track: &TrackId,
        limit: usize,
    ) -> Result<Vec<Track>, FetchError> {
        if self.unreachable_ids.contains(&track.0) {
            return Err(FetchError::new(&track.0, "simulated fetch failure"));
        }
        Ok(self
            .sonic_similar_tracks
            .get(track)
            .into_iter()
            .flatten()
            .take(limit)
            .filter_map(|id| self.tracks.get(id).cloned())
            .collect())
    }

    async fn list_playlists(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.playlists.lock().unwrap().keys().cloned().collect())
    }

    async fn playlist_items(&self, name: &str) -> Result<Vec<Track>, FetchError> {
        let ids = self
            .playlists
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default();
        Ok(self.resolve(&ids))
    }

    async fn items_in_collection(&self, name: &str) -> Result<Vec<LibraryItem>, FetchError> {
        Ok(self
            .collections
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|member| match member {
                CollectionMember::Track(id) => self.tracks.get(id).cloned().map(LibraryItem::Track),
                CollectionMember::Album(id) => self.albums.get(id).cloned().map(LibraryItem::Album),
                CollectionMember::Artist(id) => {
                    self.artists.get(id).cloned().map(LibraryItem::Artist)
                }
            })
            .collect())
    }

    async fn create_playlist(&self, name: &str, tracks: &[Track]) -> Result<(), FetchError> {
        let ids = tracks.iter().map(|t| t.id.clone()).collect();
        self.playlists.lock().unwrap().insert(name.to_string(), ids);
        Ok(())
    }

    async fn replace_playlist_items(&self, name: &str, tracks: &[Track]) -> Result<(), FetchError> {
        let ids = tracks.iter().map(|t| t.id.clone()).collect();
        self.playlists.lock().unwrap().insert(name.to_string(), ids);
        Ok(())
    }

    async fn set_playlist_summary(&self, name: &str, summary: &str) -> Result<(), FetchError> {
        self.playlist_summaries
            .lock()
            .unwrap()
            .insert(name.to_string(), summary.to_string());
        Ok(())
    }

    async fn upload_playlist_poster(
        &self,
        name: &str,
        image_path: &std::path::Path,
    ) -> Result<(), FetchError> {
        self.uploaded_posters
            .lock()
            .unwrap()
            .push((name.to_string(), image_path.to_path_buf()));
        Ok(())
    }

    async fn check_connection(&self) -> Result<(), String> {
        if self.connection_ok {
            Ok(())
        } else {
            Err("simulated connection failure".to_string())
        }
    }
}
