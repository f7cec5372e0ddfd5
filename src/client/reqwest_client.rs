//! `reqwest`-backed `LibraryClient` talking to a Plex-family Library Server.

use super::{HistoryEntry, LibraryClient, LibraryItem};
use crate::core::config::{AlbumId, ArtistId, TrackId, DEFAULT_TIMEOUT};
use crate::core::errors::FetchError;
use crate::domain::{Album, Artist, RawAlbum, RawArtist, RawTrack, Track};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::OnceCell;

/// Envelope the Library Server wraps every `Metadata` listing in.
#[derive(Debug, Deserialize)]
struct MediaContainerEnvelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: MediaContainer<T>,
}

#[derive(Debug, Deserialize)]
struct MediaContainer<T> {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<T>,
}

pub struct ReqwestLibraryClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    music_library: String,
    section_id: OnceCell<String>,
}

impl ReqwestLibraryClient {
    pub fn new(base_url: String, token: String, music_library: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("reqwest client builds with static TLS config");
        Self {
            http,
            base_url,
            token,
            music_library,
            section_id: OnceCell::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, FetchError> {
        let resp = self
            .http
            .get(self.url(path))
            .header("X-Plex-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::new(path, e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::new(path, format!("HTTP {}", resp.status())));
        }
        resp.json::<T>()
            .await
            .map_err(|e| FetchError::new(path, format!("decode error: {e}")))
    }

    async fn metadata_list<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, FetchError> {
        let env: MediaContainerEnvelope<T> = self.get_json(path).await?;
        Ok(env.media_container.metadata)
    }

    async fn section_id(&self) -> Result<&str, FetchError> {
        self.section_id
            .get_or_try_init(|| async {
                #[derive(Deserialize)]
                struct Directory {
                    key: String,
                    title: String,
                }
                #[derive(Deserialize)]
                struct Sections {
                    #[serde(rename = "MediaContainer")]
                    media_container: SectionsInner,
                }
                #[derive(Deserialize)]
                struct SectionsInner {
                    #[serde(rename = "Directory", default)]
                    directory: Vec<Directory>,
                }
                let sections: Sections = self.get_json("/library/sections").await?;
                sections
                    .media_container
                    .directory
                    .into_iter()
                    .find(|d| d.title == self.music_library)
                    .map(|d| d.key)
                    .ok_or_else(|| {
                        FetchError::new(
                            "/library/sections",
                            format!("no section named '{}'", self.music_library),
                        )
                    })
            })
            .await
            .map(|s| s.as_str())
    }

    async fn sonic_similar_tracks_preferred(
        &self,
        track: &TrackId,
        limit: usize,
    ) -> Result<Vec<Track>, FetchError> {
        let path = format!("/library/metadata/{}/related/sonic?limit={limit}", track.0);
        let raw: Vec<RawTrack> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Track::from).collect())
    }

    async fn sonic_similar_tracks_fallback(
        &self,
        track: &TrackId,
        limit: usize,
    ) -> Result<Vec<Track>, FetchError> {
        let path = format!(
            "/library/metadata/{}/nearest?context=sonicallySimilar&limit={limit}",
            track.0
        );
        let raw: Vec<RawTrack> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Track::from).collect())
    }
}

#[async_trait]
impl LibraryClient for ReqwestLibraryClient {
    async fn fetch_item(&self, id: &str) -> Result<LibraryItem, FetchError> {
        let path = format!("/library/metadata/{id}");
        let raw: serde_json::Value = self.get_json(&path).await?;
        let entry = raw
            .get("MediaContainer")
            .and_then(|mc| mc.get("Metadata"))
            .and_then(|m| m.get(0))
            .cloned()
            .ok_or_else(|| FetchError::new(&path, "empty Metadata array"))?;
        let type_hint = entry.get("type").and_then(|t| t.as_str()).unwrap_or("");
        match type_hint {
            "artist" => Ok(LibraryItem::Artist(Artist::from(
                serde_json::from_value::<RawArtist>(entry)
                    .map_err(|e| FetchError::new(&path, e.to_string()))?,
            ))),
            "album" => Ok(LibraryItem::Album(Album::from(
                serde_json::from_value::<RawAlbum>(entry)
                    .map_err(|e| FetchError::new(&path, e.to_string()))?,
            ))),
            _ => Ok(LibraryItem::Track(Track::from(
                serde_json::from_value::<RawTrack>(entry)
                    .map_err(|e| FetchError::new(&path, e.to_string()))?,
            ))),
        }
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, FetchError> {
        let section = self.section_id().await?;
        let path = format!("/library/sections/{section}/all?type=8");
        let raw: Vec<RawArtist> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Artist::from).collect())
    }

    async fn list_albums_for_artist(&self, artist: &ArtistId) -> Result<Vec<Album>, FetchError> {
        let path = format!("/library/metadata/{}/children", artist.0);
        let raw: Vec<RawAlbum> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Album::from).collect())
    }

    async fn list_tracks_for_album(&self, album: &AlbumId) -> Result<Vec<Track>, FetchError> {
        let path = format!("/library/metadata/{}/children", album.0);
        let raw: Vec<RawTrack> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Track::from).collect())
    }

    async fn list_tracks_for_artist(&self, artist: &ArtistId) -> Result<Vec<Track>, FetchError> {
        let path = format!("/library/metadata/{}/allLeaves", artist.0);
        let raw: Vec<RawTrack> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Track::from).collect())
    }

    async fn search_tracks(&self, genre: &str, limit: usize) -> Result<Vec<Track>, FetchError> {
        let section = self.section_id().await?;
        let genre = urlencoding::encode(genre);
        let path = format!("/library/sections/{section}/all?type=10&genre={genre}&limit={limit}");
        let raw: Vec<RawTrack> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Track::from).collect())
    }

    async fn search_albums(&self, genre: &str, limit: usize) -> Result<Vec<Album>, FetchError> {
        let section = self.section_id().await?;
        let genre = urlencoding::encode(genre);
        let path = format!("/library/sections/{section}/all?type=9&genre={genre}&limit={limit}");
        let raw: Vec<RawAlbum> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Album::from).collect())
    }

    async fn search_artists_by_name(&self, name: &str) -> Result<Vec<Artist>, FetchError> {
        let section = self.section_id().await?;
        let name = urlencoding::encode(name);
        let path = format!("/library/sections/{section}/all?type=8&title={name}");
        let raw: Vec<RawArtist> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Artist::from).collect())
    }

    async fn history(&self, since: DateTime<Utc>) -> Result<Vec<HistoryEntry>, FetchError> {
        #[derive(Deserialize)]
        struct RawHistoryEntry {
            #[serde(rename = "ratingKey")]
            rating_key: String,
            #[serde(rename = "viewedAt")]
            viewed_at: i64,
        }
        let path = format!(
            "/status/sessions/history/all?sort=viewedAt:desc&viewedAt>={}",
            since.timestamp()
        );
        let raw: Vec<RawHistoryEntry> = self.metadata_list(&path).await?;
        Ok(raw
            .into_iter()
            .filter_map(|e| {
                DateTime::from_timestamp(e.viewed_at, 0).map(|viewed_at| HistoryEntry {
                    rating_key: TrackId(e.rating_key),
                    viewed_at,
                })
            })
            .collect())
    }

    async fn sonic_similar_albums(
        &self,
        album: &AlbumId,
        limit: usize,
    ) -> Result<Vec<Album>, FetchError> {
        let path = format!("/library/metadata/{}/nearest?type=9&limit={limit}", album.0);
        let raw: Vec<RawAlbum> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Album::from).collect())
    }

    async fn sonic_similar_artists(
        &self,
        artist: &ArtistId,
        limit: usize,
    ) -> Result<Vec<Artist>, FetchError> {
        let path = format!("/library/metadata/{}/nearest?type=8&limit={limit}", artist.0);
        let raw: Vec<RawArtist> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Artist::from).collect())
    }

    async fn sonic_similar_tracks(
        &self,
        track: &TrackId,
        limit: usize,
    ) -> Result<Vec<Track>, FetchError> {
        match self.sonic_similar_tracks_preferred(track, limit).await {
            Ok(tracks) => Ok(tracks),
            Err(_) => self.sonic_similar_tracks_fallback(track, limit).await,
        }
    }

    async fn list_playlists(&self) -> Result<Vec<String>, FetchError> {
        #[derive(Deserialize)]
        struct RawPlaylist {
            title: String,
        }
        let raw: Vec<RawPlaylist> = self.metadata_list("/playlists?playlistType=audio").await?;
        Ok(raw.into_iter().map(|p| p.title).collect())
    }

    async fn playlist_items(&self, name: &str) -> Result<Vec<Track>, FetchError> {
        let id = self.playlist_rating_key(name).await?;
        let path = format!("/playlists/{id}/items");
        let raw: Vec<RawTrack> = self.metadata_list(&path).await?;
        Ok(raw.into_iter().map(Track::from).collect())
    }

    async fn items_in_collection(&self, name: &str) -> Result<Vec<LibraryItem>, FetchError> {
        let section = self.section_id().await?;
        let name_enc = urlencoding::encode(name);
        let path = format!("/library/sections/{section}/all?collection={name_enc}");
        let raw: Vec<serde_json::Value> = self.metadata_list(&path).await?;
        let mut items = Vec::with_capacity(raw.len());
        for entry in raw {
            let type_hint = entry.get("type").and_then(|t| t.as_str()).unwrap_or("");
            let item = match type_hint {
                "artist" => LibraryItem::Artist(Artist::from(
                    serde_json::from_value::<RawArtist>(entry)
                        .map_err(|e| FetchError::new(&path, e.to_string()))?,
                )),
                "album" => LibraryItem::Album(Album::from(
                    serde_json::from_value::<RawAlbum>(entry)
                        .map_err(|e| FetchError::new(&path, e.to_string()))?,
                )),
                _ => LibraryItem::Track(Track::from(
                    serde_json::from_value::<RawTrack>(entry)
                        .map_err(|e| FetchError::new(&path, e.to_string()))?,
                )),
            };
            items.push(item);
        }
        Ok(items)
    }

    async fn create_playlist(&self, name: &str, tracks: &[Track]) -> Result<(), FetchError> {
        let uri = self.playlist_uri(tracks);
        let name_enc = urlencoding::encode(name);
        let path = format!("/playlists?type=audio&title={name_enc}&smart=0&uri={uri}");
        self.post_empty(&path).await
    }

    async fn replace_playlist_items(&self, name: &str, tracks: &[Track]) -> Result<(), FetchError> {
        let id = self.playlist_rating_key(name).await?;
        let existing = self.playlist_items(name).await.unwrap_or_default();
        for track in &existing {
            let path = format!("/playlists/{id}/items/{}", track.id.0);
            self.delete(&path).await?;
        }
        let uri = self.playlist_uri(tracks);
        let path = format!("/playlists/{id}/items?uri={uri}");
        self.post_empty(&path).await
    }

    async fn set_playlist_summary(&self, name: &str, summary: &str) -> Result<(), FetchError> {
        let id = self.playlist_rating_key(name).await?;
        let summary_enc = urlencoding::encode(summary);
        let path = format!("/playlists/{id}?summary={summary_enc}");
        self.put_empty(&path).await
    }

    async fn upload_playlist_poster(
        &self,
        name: &str,
        image_path: &std::path::Path,
    ) -> Result<(), FetchError> {
        let id = self.playlist_rating_key(name).await?;
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| FetchError::new("cover image", e.to_string()))?;
        let path = format!("/library/metadata/{id}/posters");
        self.http
            .post(self.url(&path))
            .header("X-Plex-Token", &self.token)
            .header("Content-Type", "image/png")
            .body(bytes)
            .send()
            .await
            .map_err(|e| FetchError::new(&path, e.to_string()))?;
        Ok(())
    }

    async fn check_connection(&self) -> Result<(), String> {
        self.http
            .get(self.url("/identity"))
            .header("X-Plex-Token", &self.token)
            .send()
            .await
            .map_err(|e| format!("cannot reach library server: {e}"))?;
        self.section_id()
            .await
            .map_err(|e| format!("music section unavailable: {e}"))?;
        Ok(())
    }
}

impl ReqwestLibraryClient {
    async fn playlist_rating_key(&self, name: &str) -> Result<String, FetchError> {
        #[derive(Deserialize)]
        struct RawPlaylist {
            #[serde(rename = "ratingKey")]
            rating_key: String,
            title: String,
        }
        let raw: Vec<RawPlaylist> = self.metadata_list("/playlists?playlistType=audio").await?;
        raw.into_iter()
            .find(|p| p.title == name)
            .map(|p| p.rating_key)
            .ok_or_else(|| FetchError::new("/playlists", format!("no playlist named '{name}'")))
    }

    fn playlist_uri(&self, tracks: &[Track]) -> String {
        let ids = tracks
            .iter()
            .map(|t| t.id.0.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let base = self.base_url.trim_end_matches('/');
        urlencoding::encode(&format!(
            "server://{base}/com.plexapp.plugins.library/library/metadata/{ids}"
        ))
        .into_owned()
    }

    async fn post_empty(&self, path: &str) -> Result<(), FetchError> {
        let resp = self
            .http
            .post(self.url(path))
            .header("X-Plex-Token", &self.token)
            .send()
            .await
            .map_err(|e| FetchError::new(path, e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::new(path, format!("HTTP {}", resp.status())));
        }
        Ok(())
    }

    async fn put_empty(&self, path: &str) -> Result<(), FetchError> {
        let resp = self
            .http
            .put(self.url(path))
            .header("X-Plex-Token", &self.token)
            .send()
            .await
            .map_err(|e| FetchError::new(path, e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::new(path, format!("HTTP {}", resp.status())));
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), FetchError> {
        let resp = self
            .http
            .delete(self.url(path))
            .header("X-Plex-Token", &self.token)
            .send()
            .await
            .map_err(|e| FetchError::new(path, e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::new(path, format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}
