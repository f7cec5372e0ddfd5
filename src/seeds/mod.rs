//! Seed Collector (spec §4.2): builds the initial seed set from history,
//! explicit seeds, and Smart-Seed artist picks.

pub mod pick;

use crate::client::{LibraryClient, LibraryItem};
use crate::context::RunContext;
use crate::core::config::TrackId;
use crate::domain::{PlaylistConfig, SeedFallbackMode, SeedMode, SeedSet, TimePeriod, Track};
use chrono::{Duration, Timelike, Utc};
use std::collections::HashSet;

pub struct SeedResult {
    pub seeds: SeedSet,
    /// History-only seeds, kept separate for History Blend (spec §4.3.11)
    /// and as the baseline for `seed_mode=history`.
    pub history: Vec<Track>,
    pub excluded_keys: HashSet<TrackId>,
}

/// History seeds plus the exclusion set (spec §4.2 step 1).
async fn history_seeds(
    client: &dyn LibraryClient,
    cfg: &PlaylistConfig,
    period: Option<TimePeriod>,
) -> (Vec<Track>, HashSet<TrackId>) {
    let now = Utc::now();
    let lookback_since = now - Duration::days(cfg.history_lookback_days.max(0));
    let excluded_since = now - Duration::days(cfg.exclude_played_days.max(0));

    let recent = client.history(lookback_since).await.unwrap_or_default();
    let excluded_entries = client.history(excluded_since).await.unwrap_or_default();
    let excluded_keys: HashSet<TrackId> =
        excluded_entries.into_iter().map(|e| e.rating_key).collect();

    let allowed_hours = period.map(|p| p.allowed_hours());

    let mut seeds = Vec::new();
    for entry in recent {
        if let Some(hours) = &allowed_hours {
            if !hours.contains(&entry.viewed_at.hour()) {
                continue;
            }
        }
        if excluded_keys.contains(&entry.rating_key) {
            continue;
        }
        let item = match client.fetch_item(&entry.rating_key.0).await {
            Ok(item) => item,
            Err(_) => continue,
        };
        let track = match item.into_track() {
            Some(t) => t,
            None => continue,
        };
        if cfg.history_min_rating > 0.0 {
            match track.user_rating {
                None => continue,
                Some(r) if r < cfg.history_min_rating => continue,
                _ => {}
            }
        }
        if let Some(max_pc) = cfg.history_max_play_count() {
            if track.play_count > max_pc {
                continue;
            }
        }
        seeds.push(track);
    }
    (seeds, excluded_keys)
}

async fn flatten_collection_items(
    client: &dyn LibraryClient,
    items: Vec<LibraryItem>,
) -> Vec<Track> {
    let mut out = Vec::new();
    for item in items {
        match item {
            LibraryItem::Track(t) => out.push(t),
            LibraryItem::Album(a) => {
                if let Ok(tracks) = client.list_tracks_for_album(&a.id).await {
                    out.extend(tracks);
                }
            }
            LibraryItem::Artist(a) => {
                if let Ok(tracks) = client.list_tracks_for_artist(&a.id).await {
                    out.extend(tracks);
                }
            }
        }
    }
    out
}

/// Runs the full Seed Collector algorithm (spec §4.2), including the
/// seed_mode-dependent fallback.
pub async fn collect_seeds(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    cfg: &PlaylistConfig,
    period: Option<TimePeriod>,
    mode: SeedMode,
) -> SeedResult {
    let (history, excluded_keys) = history_seeds(client, cfg, period).await;

    let mut seeds = SeedSet::default();
    for t in history.iter().cloned() {
        seeds.push_unique(t);
    }

    for key in &cfg.seed_track_keys {
        if let Ok(item) = client.fetch_item(key).await {
            if let Some(t) = item.into_track() {
                seeds.push_unique(t);
            }
        }
    }

    for name in &cfg.seed_playlist_names {
        if let Ok(tracks) = client.playlist_items(name).await {
            for t in tracks {
                seeds.push_unique(t);
            }
        }
    }

    for name in &cfg.seed_collection_names {
        if let Ok(items) = client.items_in_collection(name).await {
            for t in flatten_collection_items(client, items).await {
                seeds.push_unique(t);
            }
        }
    }

    let target_seeds = if matches!(mode, SeedMode::AlbumEchoes) {
        cfg.deep_dive_target.max(1)
    } else {
        5
    };
    for name in &cfg.seed_artist_names {
        let matches = client.search_artists_by_name(name).await.unwrap_or_default();
        let artist = match matches.into_iter().next() {
            Some(a) => a,
            None => continue,
        };
        let mut picked = 0usize;
        let mut attempts = 0usize;
        while picked < target_seeds && attempts < target_seeds * 4 {
            attempts += 1;
            if let Some(t) = pick::pick_track_from_artist(client, ctx, &artist, cfg).await {
                if !seeds.ids().contains(&t.id) {
                    seeds.push_unique(t);
                    picked += 1;
                }
            }
        }
        if picked == 0 {
            if let Ok(tracks) = client.list_tracks_for_artist(&artist.id).await {
                for t in tracks.into_iter().take(3) {
                    seeds.push_unique(t);
                }
            }
        }
    }

    if !matches!(mode, SeedMode::History | SeedMode::StrictCollection) && seeds.is_empty() {
        match cfg.seed_fallback_mode {
            SeedFallbackMode::History => {
                for t in history {
                    seeds.push_unique(t);
                }
            }
            SeedFallbackMode::Genre => {
                let genres = if cfg.genre_seeds.is_empty() {
                    vec!["Rock".to_string()]
                } else {
                    cfg.genre_seeds.clone()
                };
                let harvested = crate::expansion::genre::harvest_genre(client, ctx, &genres, cfg).await;
                for t in harvested {
                    seeds.push_unique(t);
                }
            }
        }
    }

    SeedResult {
        seeds,
        history,
        excluded_keys,
    }
}
