//! Genre expansion (spec §4.3.2): used for `seed_mode=genre` and as the
//! genre fallback.

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::{
    GENRE_ALBUM_SEARCH_LIMIT, GENRE_ALBUM_TRACK_KEEP_LIMIT, GENRE_ALBUM_WALK_LIMIT,
    GENRE_TRACK_KEEP_LIMIT, GENRE_TRACK_SEARCH_LIMIT, TrackId,
};
use crate::domain::{CandidatePool, PlaylistConfig};
use crate::filter::{FilterOutcome, StaticFilter};
use rand::seq::SliceRandom;
use std::collections::HashSet;

pub async fn harvest_genre(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    genres: &[String],
    cfg: &PlaylistConfig,
) -> CandidatePool {
    let filter = StaticFilter::new(cfg);
    let mut seen: HashSet<TrackId> = HashSet::new();
    let mut pool = Vec::new();
    let excluded = HashSet::new();

    for genre in genres {
        let mut tracks = client
            .search_tracks(genre, GENRE_TRACK_SEARCH_LIMIT)
            .await
            .unwrap_or_default();
        {
            let mut rng = ctx.rng.lock().unwrap();
            tracks.shuffle(&mut *rng);
        }

        let mut kept_here = 0usize;
        for t in &tracks {
            if kept_here >= GENRE_TRACK_KEEP_LIMIT {
                break;
            }
            if seen.contains(&t.id) {
                continue;
            }
            if filter.check(client, ctx, t, &seen, &excluded).await == FilterOutcome::Accepted {
                seen.insert(t.id.clone());
                pool.push(t.clone());
                kept_here += 1;
            }
        }

        if kept_here > 0 {
            continue;
        }

        let mut albums = client
            .search_albums(genre, GENRE_ALBUM_SEARCH_LIMIT)
            .await
            .unwrap_or_default();
        {
            let mut rng = ctx.rng.lock().unwrap();
            albums.shuffle(&mut *rng);
        }

        for album in albums.into_iter().take(GENRE_ALBUM_WALK_LIMIT) {
            let album_tracks = client.list_tracks_for_album(&album.id).await.unwrap_or_default();
            let mut kept_album = 0usize;
            for t in &album_tracks {
                if kept_album >= GENRE_ALBUM_TRACK_KEEP_LIMIT {
                    break;
                }
                if seen.contains(&t.id) {
                    continue;
                }
                if filter.check(client, ctx, t, &seen, &excluded).await == FilterOutcome::Accepted {
                    seen.insert(t.id.clone());
                    pool.push(t.clone());
                    kept_album += 1;
                }
            }
        }
    }

    pool
}
