//! Strict Collection expansion (spec §4.3.10, `seed_mode=strict_collection`).
//! Trusts curator intent: the static filter is never applied to this
//! harvester's output (spec §9 design note).

use crate::client::{LibraryClient, LibraryItem};
use crate::context::RunContext;
use crate::domain::{CandidatePool, PlaylistConfig, Track};
use chrono::Utc;

fn weight(track: &Track, slider: f64) -> f64 {
    let age_days = (Utc::now() - track.added_at).num_days().max(0) as f64;
    let recency_score = (100.0 - age_days * (100.0 / 180.0)).max(0.0);
    let legacy_score =
        (track.play_count as f64 * 5.0 + track.user_rating.unwrap_or(0.0) as f64 * 10.0).min(100.0);
    let mut w = recency_score * slider + legacy_score * (1.0 - slider);
    if slider > 0.5 && track.play_count == 0 {
        w += 30.0;
    }
    w
}

pub async fn harvest_strict_collection(
    client: &dyn LibraryClient,
    _ctx: &RunContext,
    cfg: &PlaylistConfig,
) -> CandidatePool {
    let mut tracks: Vec<Track> = Vec::new();

    for name in &cfg.include_collections {
        let items = client.items_in_collection(name).await.unwrap_or_default();
        for item in items {
            match item {
                LibraryItem::Track(t) => tracks.push(t),
                LibraryItem::Album(a) => {
                    tracks.extend(client.list_tracks_for_album(&a.id).await.unwrap_or_default());
                }
                LibraryItem::Artist(a) => {
                    tracks.extend(client.list_tracks_for_artist(&a.id).await.unwrap_or_default());
                }
            }
        }
    }

    let slider = cfg.legacy_vs_recency_slider;
    tracks.sort_by(|a, b| {
        weight(b, slider)
            .partial_cmp(&weight(a, slider))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    tracks.truncate(cfg.max_tracks * 4);
    tracks
}
