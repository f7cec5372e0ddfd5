//! `smart_sort` — the explore/exploit ranking function (spec §4.5).

use crate::context::RunContext;
use crate::domain::Track;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

/// Sorts `tracks` in place per spec §4.5. `use_popularity=true` ranks by
/// `viewCount + ratingCount*10` normalized against the pool max;
/// `use_popularity=false` assumes the pool already arrives in similarity
/// order and ranks by `1 - index/n`.
pub fn smart_sort(
    tracks: &mut Vec<Track>,
    ctx: &RunContext,
    exploit_weight: f64,
    use_popularity: bool,
    recent_days: i64,
    recent_weight: f64,
) {
    let mut rng = ctx.rng.lock().unwrap();

    if exploit_weight <= 0.01 {
        tracks.shuffle(&mut *rng);
        return;
    }

    let n = tracks.len();
    if n == 0 {
        return;
    }

    let raw_scores: Vec<f64> = tracks
        .iter()
        .map(|t| t.play_count as f64 + t.rating_count as f64 * 10.0)
        .collect();
    let max_raw = raw_scores.iter().cloned().fold(0.0_f64, f64::max).max(1.0);

    let now = Utc::now();
    let mut scored: Vec<(f64, Track)> = tracks
        .drain(..)
        .enumerate()
        .map(|(idx, t)| {
            let mut quality = if use_popularity {
                raw_scores[idx] / max_raw
            } else {
                1.0 - (idx as f64 / n as f64)
            };
            if recent_days > 0 {
                let age_days = (now - t.added_at).num_days();
                if age_days <= recent_days {
                    quality *= recent_weight;
                }
            }
            let score = quality * exploit_weight + rng.gen::<f64>() * (1.0 - exploit_weight);
            (score, t)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    tracks.extend(scored.into_iter().map(|(_, t)| t));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TrackId;

    fn track(id: &str, play_count: u64, rating_count: u64) -> Track {
        Track {
            id: TrackId(id.to_string()),
            title: id.to_string(),
            album_id: None,
            artist_id: None,
            artist_name: "A".into(),
            track_index: None,
            disc_index: None,
            duration_ms: 0,
            added_at: Utc::now() - chrono::Duration::days(1000),
            user_rating: None,
            play_count,
            rating_count,
            year: None,
            genres: vec![],
            collections: vec![],
        }
    }

    #[test]
    fn ranks_by_popularity_when_exploit_is_one() {
        let ctx = RunContext::new(Some(42));
        let mut tracks = vec![track("low", 1, 0), track("high", 100, 0)];
        smart_sort(&mut tracks, &ctx, 1.0, true, 0, 1.0);
        assert_eq!(tracks[0].id.0, "high");
    }

    #[test]
    fn deterministic_shuffle_under_fixed_seed() {
        let ctx1 = RunContext::new(Some(7));
        let ctx2 = RunContext::new(Some(7));
        let mut a = vec![track("1", 0, 0), track("2", 0, 0), track("3", 0, 0)];
        let mut b = a.clone();
        smart_sort(&mut a, &ctx1, 0.0, true, 0, 1.0);
        smart_sort(&mut b, &ctx2, 0.0, true, 0, 1.0);
        let ids_a: Vec<_> = a.iter().map(|t| t.id.0.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|t| t.id.0.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }
}
