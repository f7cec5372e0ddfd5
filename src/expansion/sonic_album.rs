//! Sonic Album Mix expansion (spec §4.3.3), also used by Sonic Combo.

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::{AlbumId, SONIC_ALBUM_TRACK_KEEP_LIMIT, SONIC_OVERFETCH_FLOOR, TrackId};
use crate::domain::{CandidatePool, PlaylistConfig, Track};
use crate::filter::{cached_album, smart_sort, FilterOutcome, StaticFilter};
use std::collections::HashSet;

fn overfetch_limit(cfg: &PlaylistConfig) -> usize {
    SONIC_OVERFETCH_FLOOR.max(2 * cfg.sonic_similar_limit)
}

pub async fn harvest_sonic_album_mix(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    seeds: &[Track],
    cfg: &PlaylistConfig,
) -> CandidatePool {
    let filter = StaticFilter::new(cfg);
    let excluded: HashSet<TrackId> = HashSet::new();
    let mut seen: HashSet<TrackId> = HashSet::new();

    let mut seed_album_ids: Vec<AlbumId> = Vec::new();
    let mut seen_albums: HashSet<AlbumId> = HashSet::new();
    for t in seeds {
        if let Some(id) = &t.album_id {
            if seen_albums.insert(id.clone()) {
                seed_album_ids.push(id.clone());
            }
        }
    }

    let limit = overfetch_limit(cfg);
    let mut expanded: Vec<AlbumId> = Vec::new();
    let mut expanded_seen: HashSet<AlbumId> = HashSet::new();
    for id in &seed_album_ids {
        if expanded_seen.insert(id.clone()) {
            expanded.push(id.clone());
        }
        if let Some(album) = cached_album(client, ctx, id).await {
            let similar = client
                .sonic_similar_albums(&album.id, limit)
                .await
                .unwrap_or_default();
            for a in similar {
                if expanded_seen.insert(a.id.clone()) {
                    expanded.push(a.id.clone());
                }
            }
        }
    }

    let mut pool = Vec::new();
    for album_id in &expanded {
        let mut tracks = client.list_tracks_for_album(album_id).await.unwrap_or_default();
        smart_sort(&mut tracks, ctx, cfg.exploit_weight, true, 0, 1.0);
        let mut kept = 0usize;
        for t in tracks {
            if kept >= SONIC_ALBUM_TRACK_KEEP_LIMIT {
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
