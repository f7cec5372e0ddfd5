//! Pick-track helpers (spec §4.4): Smart-Seed track selection within an
//! artist's discography.

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::domain::{Album, Artist, PlaylistConfig, Track};
use rand::seq::SliceRandom;
use rand::Rng;

/// Album-level gate used before considering any of its tracks: year,
/// collection, and genre constraints. Rejects the whole album on violation
/// (spec §4.4 "enforce album-level ... constraints first").
fn album_allowed(album: &Album, cfg: &PlaylistConfig) -> bool {
    if cfg.min_year > 0 || cfg.max_year > 0 {
        let year = album.effective_year().unwrap_or(0);
        if year == 0 {
            return false;
        }
        if cfg.min_year > 0 && year < cfg.min_year {
            return false;
        }
        if cfg.max_year > 0 && year > cfg.max_year {
            return false;
        }
    }
    if !cfg.include_collections.is_empty()
        && !cfg.include_collections.iter().any(|c| album.collections.contains(c))
    {
        return false;
    }
    if cfg.exclude_collections.iter().any(|c| album.collections.contains(c)) {
        return false;
    }
    let exclude = cfg.exclude_genres_lower();
    if !exclude.is_empty()
        && album
            .genres
            .iter()
            .any(|g| exclude.contains(&g.to_lowercase()))
    {
        return false;
    }
    true
}

/// Picks one track from `album`'s track list per spec §4.4: filter with the
/// static predicate, sort by popularity descending, then either a uniform
/// pick from the top third (probability `exploit_weight`) or a rank-biased
/// pick (`idx = floor(random()^2 * (n-1))`).
pub async fn pick_track_from_album(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    album: &Album,
    cfg: &PlaylistConfig,
) -> Option<Track> {
    if !album_allowed(album, cfg) {
        return None;
    }
    let tracks = client.list_tracks_for_album(&album.id).await.ok()?;
    let filter = crate::filter::StaticFilter::new(cfg);
    let mut filtered = Vec::new();
    let seen = Default::default();
    let excluded = Default::default();
    for t in tracks {
        if filter.check(client, ctx, &t, &seen, &excluded).await == crate::filter::FilterOutcome::Accepted {
            filtered.push(t);
        }
    }
    if filtered.is_empty() {
        return None;
    }
    filtered.sort_by(|a, b| {
        let pa = a.play_count as f64 + a.rating_count as f64 * 10.0;
        let pb = b.play_count as f64 + b.rating_count as f64 * 10.0;
        pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
    });

    let n = filtered.len();
    let mut rng = ctx.rng.lock().unwrap();
    let roll: f64 = rng.gen();
    let idx = if roll < cfg.exploit_weight {
        let top_third = (n / 3).max(1);
        rng.gen_range(0..top_third)
    } else {
        let r: f64 = rng.gen();
        ((r * r) * (n.saturating_sub(1)) as f64).floor() as usize
    };
    Some(filtered.remove(idx.min(n - 1)))
}

/// Shuffles `artist`'s albums and returns the first album that yields a pick
/// (spec §4.4).
pub async fn pick_track_from_artist(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    artist: &Artist,
    cfg: &PlaylistConfig,
) -> Option<Track> {
    let mut albums = client.list_albums_for_artist(&artist.id).await.ok()?;
    {
        let mut rng = ctx.rng.lock().unwrap();
        albums.shuffle(&mut *rng);
    }
    for album in &albums {
        if let Some(track) = pick_track_from_album(client, ctx, album, cfg).await {
            return Some(track);
        }
    }
    None
}
