//! Cap enforcement (spec §4.5 "Cap enforcement"): per-artist/per-album caps
//! and genre strictness with an off-genre quota.

use super::{cached_album, cached_artist};
use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::{AlbumId, ArtistId};
use crate::domain::{PlaylistConfig, Track};
use std::collections::{HashMap, HashSet};

/// Candidate genre set with fallback track → album → artist; first
/// non-empty source wins (spec §4.5).
async fn candidate_genres(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    track: &Track,
) -> HashSet<String> {
    if !track.genres.is_empty() {
        return track.genres.iter().map(|g| g.to_lowercase()).collect();
    }
    if let Some(id) = &track.album_id {
        if let Some(album) = cached_album(client, ctx, id).await {
            if !album.genres.is_empty() {
                return album.genres.iter().map(|g| g.to_lowercase()).collect();
            }
        }
    }
    if let Some(id) = &track.artist_id {
        if let Some(artist) = cached_artist(client, ctx, id).await {
            if !artist.genres.is_empty() {
                return artist.genres.iter().map(|g| g.to_lowercase()).collect();
            }
        }
    }
    HashSet::new()
}

/// Walks `ranked` (already sorted by `smart_sort`) and accepts up to
/// `cfg.max_tracks` tracks honoring per-artist/per-album caps and the
/// genre-strictness off-genre quota.
pub async fn enforce_caps(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    ranked: Vec<Track>,
    cfg: &PlaylistConfig,
) -> Vec<Track> {
    let mut final_list = Vec::new();
    let mut artist_counts: HashMap<ArtistId, usize> = HashMap::new();
    let mut album_counts: HashMap<AlbumId, usize> = HashMap::new();
    let seed_genres: HashSet<String> = cfg.genre_seeds.iter().map(|g| g.to_lowercase()).collect();
    let off_genre_cap = ((cfg.max_tracks as f64) * cfg.allow_off_genre_fraction).floor() as usize;
    let mut off_genre_count = 0usize;

    for track in ranked {
        if final_list.len() >= cfg.max_tracks {
            break;
        }

        if cfg.max_tracks_per_artist > 0 {
            if let Some(aid) = &track.artist_id {
                if *artist_counts.get(aid).unwrap_or(&0) >= cfg.max_tracks_per_artist {
                    ctx.bump_reject("artist_cap");
                    continue;
                }
            }
        }
        if cfg.max_tracks_per_album > 0 {
            if let Some(alid) = &track.album_id {
                if *album_counts.get(alid).unwrap_or(&0) >= cfg.max_tracks_per_album {
                    ctx.bump_reject("album_cap");
                    continue;
                }
            }
        }

        let mut on_genre = true;
        if !seed_genres.is_empty() {
            let genres = candidate_genres(client, ctx, &track).await;
            on_genre = genres.iter().any(|g| seed_genres.contains(g));
            if cfg.genre_strict && !on_genre && off_genre_count >= off_genre_cap {
                ctx.bump_reject("off_genre_quota");
                continue;
            }
            if !on_genre {
                off_genre_count += 1;
            }
        }

        if let Some(aid) = &track.artist_id {
            *artist_counts.entry(aid.clone()).or_insert(0) += 1;
        }
        if let Some(alid) = &track.album_id {
            *album_counts.entry(alid.clone()).or_insert(0) += 1;
        }
        final_list.push(track);
    }

    final_list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLibraryClient;
    use crate::core::config::TrackId;
    use chrono::Utc;

    fn track(id: &str, artist: &str) -> Track {
        Track {
            id: TrackId(id.to_string()),
            title: id.to_string(),
            album_id: None,
            artist_id: Some(ArtistId(artist.to_string())),
            artist_name: artist.to_string(),
            track_index: None,
            disc_index: None,
            duration_ms: 0,
            added_at: Utc::now(),
            user_rating: None,
            play_count: 0,
            rating_count: 0,
            year: None,
            genres: vec![],
            collections: vec![],
        }
    }

    #[tokio::test]
    async fn enforces_artist_cap() {
        let cfg = PlaylistConfig {
            max_tracks: 10,
            max_tracks_per_artist: 2,
            ..PlaylistConfig::default()
        };
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let ranked = vec![
            track("1", "Y"),
            track("2", "Y"),
            track("3", "Y"),
            track("4", "Y"),
        ];
        let out = enforce_caps(&client, &ctx, ranked, &cfg).await;
        assert_eq!(out.len(), 2);
    }

    #[tokio::test]
    async fn stops_at_max_tracks() {
        let cfg = PlaylistConfig {
            max_tracks: 2,
            ..PlaylistConfig::default()
        };
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let ranked = vec![track("1", "A"), track("2", "B"), track("3", "C")];
        let out = enforce_caps(&client, &ctx, ranked, &cfg).await;
        assert_eq!(out.len(), 2);
    }
}
