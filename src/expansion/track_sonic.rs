//! Track Sonic expansion (spec §4.3.6, `seed_mode=track_sonic`).

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::TrackId;
use crate::domain::{CandidatePool, PlaylistConfig, Track};
use crate::filter::{smart_sort, FilterOutcome, StaticFilter};
use std::collections::HashSet;

pub async fn harvest_track_sonic(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    seeds: &[Track],
    cfg: &PlaylistConfig,
) -> CandidatePool {
    if seeds.is_empty() {
        return Vec::new();
    }
    let limit_per_seed = ((cfg.max_tracks as f64 / seeds.len() as f64).ceil() as usize + 2)
        .min(cfg.sonic_similar_limit);

    let filter = StaticFilter::new(cfg);
    let excluded: HashSet<TrackId> = HashSet::new();
    let mut seen: HashSet<TrackId> = HashSet::new();
    let mut pool = Vec::new();

    for seed in seeds {
        let mut neighbors = client
            .sonic_similar_tracks(&seed.id, cfg.sonic_similar_limit)
            .await
            .unwrap_or_default();
        smart_sort(&mut neighbors, ctx, cfg.exploit_weight, false, 0, 1.0);

        let mut kept = 0usize;
        for t in neighbors {
            if kept >= limit_per_seed {
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
