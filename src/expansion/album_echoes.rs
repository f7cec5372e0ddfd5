//! Deep Dive / Album Echoes expansion (spec §4.3.9, `seed_mode=album_echoes`).

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::{AlbumId, TrackId};
use crate::domain::{CandidatePool, PlaylistConfig, Track};
use crate::filter::smart_sort;
use std::collections::{HashSet, VecDeque};

pub async fn harvest_album_echoes(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    seeds: &[Track],
    excluded_keys: &HashSet<TrackId>,
    cfg: &PlaylistConfig,
) -> CandidatePool {
    let seed_ids: HashSet<TrackId> = seeds.iter().map(|t| t.id.clone()).collect();

    let mut album_ids: Vec<AlbumId> = Vec::new();
    let mut seen_albums: HashSet<AlbumId> = HashSet::new();
    for t in seeds {
        if let Some(id) = &t.album_id {
            if seen_albums.insert(id.clone()) {
                album_ids.push(id.clone());
            }
        }
    }

    let mut lists: Vec<VecDeque<Track>> = Vec::new();
    for album_id in &album_ids {
        let mut tracks = client.list_tracks_for_album(album_id).await.unwrap_or_default();
        smart_sort(&mut tracks, ctx, cfg.exploit_weight, true, 0, 1.0);
        tracks.retain(|t| !seed_ids.contains(&t.id));

        let (unplayed, played): (Vec<Track>, Vec<Track>) =
            tracks.into_iter().partition(|t| !excluded_keys.contains(&t.id));
        let mut combined: VecDeque<Track> = VecDeque::new();
        combined.extend(unplayed);
        combined.extend(played);
        if !combined.is_empty() {
            lists.push(combined);
        }
    }

    if lists.is_empty() {
        return Vec::new();
    }

    let base_target = cfg.max_tracks / lists.len();
    let mut result = Vec::new();

    for list in lists.iter_mut() {
        for _ in 0..base_target {
            if let Some(t) = list.pop_front() {
                result.push(t);
            } else {
                break;
            }
        }
    }

    loop {
        if result.len() >= cfg.max_tracks {
            break;
        }
        let survivors: Vec<usize> = lists
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(i, _)| i)
            .collect();
        if survivors.is_empty() {
            break;
        }
        let needed = cfg.max_tracks - result.len();
        let per_survivor = (needed as f64 / survivors.len() as f64).ceil() as usize + 1;
        for idx in &survivors {
            for _ in 0..per_survivor {
                if let Some(t) = lists[*idx].pop_front() {
                    result.push(t);
                } else {
                    break;
                }
            }
        }
    }

    result
}
