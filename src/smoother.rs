//! Smoother (spec §4.7): optional greedy anti-clump reorder along a sonic
//! gradient. Skipped entirely for `sonic_journey` mode — callers must not
//! invoke this for that mode (spec §5 ordering guarantee, testable
//! property #13).

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::SMOOTHER_NEIGHBOR_LIMIT;
use crate::domain::Track;
use rand::Rng;

pub async fn smooth(client: &dyn LibraryClient, ctx: &RunContext, pool: Vec<Track>) -> Vec<Track> {
    let mut remaining = pool;
    if remaining.is_empty() {
        return remaining;
    }

    let start_idx = {
        let mut rng = ctx.rng.lock().unwrap();
        rng.gen_range(0..remaining.len())
    };
    let mut current = remaining.remove(start_idx);
    let mut result = vec![current.clone()];

    while !remaining.is_empty() {
        let neighbors = client
            .sonic_similar_tracks(&current.id, SMOOTHER_NEIGHBOR_LIMIT)
            .await
            .unwrap_or_default();

        let mut best: Option<(usize, f64)> = None;
        for (ridx, track) in remaining.iter().enumerate() {
            if let Some(nidx) = neighbors.iter().position(|n| n.id == track.id) {
                let mut score = 100.0 - nidx as f64;
                if current.artist_id.is_some() && track.artist_id == current.artist_id {
                    score -= 25.0;
                }
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((ridx, score));
                }
            }
        }

        current = match best {
            Some((ridx, _)) => remaining.remove(ridx),
            None => remaining.remove(0),
        };
        result.push(current.clone());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLibraryClient;
    use crate::core::config::{ArtistId, TrackId};
    use chrono::Utc;

    fn track(id: &str) -> Track {
        Track {
            id: TrackId(id.to_string()),
            title: id.to_string(),
            album_id: None,
            artist_id: Some(ArtistId("A".into())),
            artist_name: "A".into(),
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
    async fn preserves_all_tracks() {
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let pool = vec![track("1"), track("2"), track("3")];
        let out = smooth(&client, &ctx, pool).await;
        let mut ids: Vec<_> = out.iter().map(|t| t.id.0.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn empty_pool_stays_empty() {
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let out = smooth(&client, &ctx, vec![]).await;
        assert!(out.is_empty());
    }
}
