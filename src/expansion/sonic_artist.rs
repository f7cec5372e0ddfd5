//! Sonic Artist Mix expansion (spec §4.3.4), also used by Sonic Combo.

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::{ArtistId, SONIC_ARTIST_TRACK_KEEP_LIMIT, SONIC_OVERFETCH_FLOOR, TrackId};
use crate::domain::{CandidatePool, PlaylistConfig, Track};
use crate::filter::{smart_sort, FilterOutcome, StaticFilter};
use std::collections::HashSet;

fn overfetch_limit(cfg: &PlaylistConfig) -> usize {
    SONIC_OVERFETCH_FLOOR.max(2 * cfg.sonic_similar_limit)
}

pub async fn harvest_sonic_artist_mix(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    seeds: &[Track],
    cfg: &PlaylistConfig,
) -> CandidatePool {
    let filter = StaticFilter::new(cfg);
    let excluded: HashSet<TrackId> = HashSet::new();
    let mut seen: HashSet<TrackId> = HashSet::new();

    let mut seed_artist_ids: Vec<ArtistId> = Vec::new();
    let mut seen_artists: HashSet<ArtistId> = HashSet::new();
    for t in seeds {
        if let Some(id) = &t.artist_id {
            if seen_artists.insert(id.clone()) {
                seed_artist_ids.push(id.clone());
            }
        }
    }

    let limit = overfetch_limit(cfg);
    let mut union: Vec<ArtistId> = seed_artist_ids.clone();
    for id in &seed_artist_ids {
        let similar = client.sonic_similar_artists(id, limit).await.unwrap_or_default();
        for a in similar {
            if seen_artists.insert(a.id.clone()) {
                union.push(a.id);
            }
        }
    }

    let mut pool = Vec::new();
    for artist_id in &union {
        let mut tracks = client.list_tracks_for_artist(artist_id).await.unwrap_or_default();
        smart_sort(&mut tracks, ctx, cfg.exploit_weight, true, 0, 1.0);
        let mut kept = 0usize;
        for t in tracks {
            if kept >= SONIC_ARTIST_TRACK_KEEP_LIMIT {
                break;
            }
            if seen.contains(&t.id) {
                continue;
            }
            if filter.check(client, ctx, &t, &seen, &excluded).await == FilterOutcome::Accepted {
                seen.insert(t.id.clone());
                pool.push(t);
                kept += 1;
            }
        }
    }
    pool
}
