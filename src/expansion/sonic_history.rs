//! Sonic History Intersection expansion (spec §4.3.7, `seed_mode=sonic_history`).

use super::{sonic_album::harvest_sonic_album_mix, sonic_artist::harvest_sonic_artist_mix};
use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::TrackId;
use crate::domain::{CandidatePool, PlaylistConfig, Track};
use crate::filter::{FilterOutcome, StaticFilter};
use rand::seq::SliceRandom;
use std::collections::HashSet;

pub async fn harvest_sonic_history(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    seeds: &[Track],
    history_seeds: &[Track],
    cfg: &PlaylistConfig,
) -> CandidatePool {
    let mut raw_pool = harvest_sonic_album_mix(client, ctx, seeds, cfg).await;
    raw_pool.extend(harvest_sonic_artist_mix(client, ctx, seeds, cfg).await);

    let history_ids: HashSet<TrackId> = history_seeds.iter().map(|t| t.id.clone()).collect();

    let mut chosen_ids: HashSet<TrackId> = HashSet::new();
    let mut result = Vec::new();

    for t in &raw_pool {
        if history_ids.contains(&t.id) && chosen_ids.insert(t.id.clone()) {
            result.push(t.clone());
        }
    }
    for t in seeds {
        if history_ids.contains(&t.id) && chosen_ids.insert(t.id.clone()) {
            result.push(t.clone());
        }
    }

    if result.len() < cfg.max_tracks {
        let mut shuffled = raw_pool.clone();
        {
            let mut rng = ctx.rng.lock().unwrap();
            shuffled.shuffle(&mut *rng);
        }
        let filter = StaticFilter::new(cfg);
        let excluded: HashSet<TrackId> = HashSet::new();
        for t in shuffled {
            if result.len() >= cfg.max_tracks {
                break;
            }
            if chosen_ids.contains(&t.id) {
                continue;
            }
            if filter.check(client, ctx, &t, &chosen_ids, &excluded).await == FilterOutcome::Accepted {
                chosen_ids.insert(t.id.clone());
                result.push(t);
            }
        }
    }

    result
}
