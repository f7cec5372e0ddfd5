//! Expansion Strategies (spec §4.3): one harvester per `seed_mode`, dispatched
//! as a `match` over the tagged variant (spec §9 design note — not class
//! inheritance).

pub mod album_echoes;
pub mod genre;
pub mod history_blend;
pub mod sonic_album;
pub mod sonic_artist;
pub mod sonic_history;
pub mod sonic_journey;
pub mod strict_collection;
pub mod track_sonic;

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::TrackId;
use crate::domain::{CandidatePool, PlaylistConfig, SeedMode, Track};
use std::collections::HashSet;

/// Resolves `SeedMode::Auto` to a concrete mode based on what seeds were
/// actually collected, per the UI label "Auto (infer from seeds/history)".
pub fn resolve_auto_mode(cfg: &PlaylistConfig) -> SeedMode {
    if cfg.seed_track_keys.len() >= 2 {
        SeedMode::SonicJourney
    } else if !cfg.genre_seeds.is_empty() {
        SeedMode::Genre
    } else if !cfg.seed_artist_names.is_empty() {
        SeedMode::SonicArtistMix
    } else {
        SeedMode::History
    }
}

/// Runs the strategy for `mode` and applies the History Blend post-step
/// (spec §4.3.11) where applicable. `history_seeds` and `excluded_keys` come
/// from the Seed Collector (spec §4.2).
pub async fn run_expansion(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    seeds: &[Track],
    history_seeds: &[Track],
    excluded_keys: &HashSet<TrackId>,
    cfg: &PlaylistConfig,
    mode: SeedMode,
) -> CandidatePool {
    let resolved = match mode {
        SeedMode::Auto => resolve_auto_mode(cfg),
        other => other,
    };

    let mut pool = match resolved {
        SeedMode::History => history_seeds.to_vec(),
        SeedMode::Genre => genre::harvest_genre(client, ctx, &cfg.genre_seeds, cfg).await,
        SeedMode::SonicAlbumMix => sonic_album::harvest_sonic_album_mix(client, ctx, seeds, cfg).await,
        SeedMode::SonicArtistMix => {
            sonic_artist::harvest_sonic_artist_mix(client, ctx, seeds, cfg).await
        }
        SeedMode::SonicCombo => {
            let mut combo = sonic_album::harvest_sonic_album_mix(client, ctx, seeds, cfg).await;
            combo.extend(sonic_artist::harvest_sonic_artist_mix(client, ctx, seeds, cfg).await);
            combo
        }
        SeedMode::TrackSonic => track_sonic::harvest_track_sonic(client, ctx, seeds, cfg).await,
        SeedMode::SonicHistory => {
            sonic_history::harvest_sonic_history(client, ctx, seeds, history_seeds, cfg).await
        }
        SeedMode::SonicJourney => {
            sonic_journey::harvest_sonic_journey(client, ctx, seeds, cfg).await
        }
        SeedMode::AlbumEchoes => {
            album_echoes::harvest_album_echoes(client, ctx, seeds, excluded_keys, cfg).await
        }
        SeedMode::StrictCollection => {
            strict_collection::harvest_strict_collection(client, ctx, cfg).await
        }
        SeedMode::Auto => unreachable!("resolved above"),
    };

    history_blend::apply_history_blend(&mut pool, ctx, history_seeds, cfg, resolved);
    pool
}
