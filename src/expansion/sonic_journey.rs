//! Sonic Journey expansion and pathfinder (spec §4.3.8, §4.6). Order is
//! semantic and must never be re-ranked or smoothed downstream.

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::{TrackId, JOURNEY_MAX_DEPTH, JOURNEY_MAX_NODES, JOURNEY_WIDTH};
use crate::domain::{CandidatePool, PlaylistConfig, Track};
use std::collections::{HashSet, VecDeque};

/// Breadth-first search over the sonic-similarity graph (spec §4.6).
/// `node_budget` is shared across legs so the whole journey respects
/// `max_nodes` neighbor-calls globally.
async fn find_sonic_path(
    client: &dyn LibraryClient,
    node_budget: &mut usize,
    start: Track,
    end: &TrackId,
    max_depth: usize,
    width: usize,
    max_nodes: usize,
) -> Option<Vec<Track>> {
    let mut visited: HashSet<TrackId> = HashSet::new();
    visited.insert(start.id.clone());
    let mut queue: VecDeque<Vec<Track>> = VecDeque::new();
    let start_is_end = &start.id == end;
    queue.push_back(vec![start]);

    if start_is_end {
        return queue.pop_front();
    }

    while let Some(path) = queue.pop_front() {
        if path.len() > max_depth + 1 {
            continue;
        }
        if *node_budget >= max_nodes {
            return None;
        }
        *node_budget += 1;
        let current_id = path.last().unwrap().id.clone();
        let neighbors = client
            .sonic_similar_tracks(&current_id, width)
            .await
            .unwrap_or_default();
        for n in neighbors {
            if !visited.insert(n.id.clone()) {
                continue;
            }
            let mut new_path = path.clone();
            let reached_end = &n.id == end;
            new_path.push(n);
            if reached_end {
                return Some(new_path);
            }
            queue.push_back(new_path);
        }
    }
    None
}

/// Appends neighbor tracks to a too-short skeleton path (spec §4.6 "inflate").
async fn inflate_path(client: &dyn LibraryClient, path: Vec<Track>, target: usize) -> Vec<Track> {
    let needed = target.saturating_sub(path.len());
    if needed == 0 || path.is_empty() {
        return path;
    }
    let per_neighbor = (needed as f64 / path.len() as f64).ceil() as usize + 2;
    let mut seen: HashSet<TrackId> = path.iter().map(|t| t.id.clone()).collect();
    let mut result = Vec::new();
    for t in &path {
        result.push(t.clone());
        let neighbors = client
            .sonic_similar_tracks(&t.id, per_neighbor + 5)
            .await
            .unwrap_or_default();
        let mut added = 0usize;
        for n in neighbors {
            if added >= per_neighbor {
                break;
            }
            if seen.insert(n.id.clone()) {
                result.push(n);
                added += 1;
            }
        }
    }
    result
}

/// Bridge used when no path is found between consecutive seeds (spec §4.6).
async fn fallback_bridge(client: &dyn LibraryClient, a: &Track, b: &Track, per_leg_target: usize) -> Vec<Track> {
    let half = per_leg_target / 2 + 2;
    let mut result = vec![a.clone()];
    result.extend(client.sonic_similar_tracks(&a.id, half).await.unwrap_or_default());
    result.extend(client.sonic_similar_tracks(&b.id, half).await.unwrap_or_default());
    result.push(b.clone());
    result
}

/// Builds the full journey across all seed legs (spec §4.3.8). The returned
/// pool is already in final order; the pipeline must truncate it to
/// `max_tracks` without re-sorting.
pub async fn harvest_sonic_journey(
    client: &dyn LibraryClient,
    _ctx: &RunContext,
    seeds: &[Track],
    cfg: &PlaylistConfig,
) -> CandidatePool {
    if seeds.len() < 2 {
        return seeds.to_vec();
    }
    let legs = seeds.len() - 1;
    let per_leg_target = (cfg.max_tracks / legs).max(5);
    let mut node_budget = 0usize;
    let mut full_path: Vec<Track> = Vec::new();

    for i in 0..legs {
        let a = &seeds[i];
        let b = &seeds[i + 1];
        let found = find_sonic_path(
            client,
            &mut node_budget,
            a.clone(),
            &b.id,
            JOURNEY_MAX_DEPTH,
            JOURNEY_WIDTH,
            JOURNEY_MAX_NODES,
        )
        .await;

        let segment = match found {
            Some(path) if path.len() >= per_leg_target => path,
            Some(path) => inflate_path(client, path, per_leg_target).await,
            None => fallback_bridge(client, a, b, per_leg_target).await,
        };

        if full_path.is_empty() {
            full_path.extend(segment);
        } else {
            let mut iter = segment.into_iter();
            iter.next();
            full_path.extend(iter);
        }
    }

    full_path
}
