//! Filter & Rank Stage (spec §4.5): static filtering, fuzzy dedup, ranking,
//! and cap enforcement.

pub mod caps;
pub mod predicate;
pub mod rank;

pub use predicate::{FilterOutcome, StaticFilter};
pub use rank::smart_sort;

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::{AlbumId, ArtistId};
use crate::domain::{Album, Artist};

/// Fetches an album by id, using the run's per-call cache (spec §5: check-
/// then-insert under the album cache mutex).
pub async fn cached_album(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    id: &AlbumId,
) -> Option<Album> {
    {
        let cache = ctx.album_cache.lock().await;
        if let Some(a) = cache.get(id) {
            return Some(a.clone());
        }
    }
    let fetched = client
        .fetch_item(&id.0)
        .await
        .ok()
        .and_then(|item| match item {
            crate::client::LibraryItem::Album(a) => Some(a),
            _ => None,
        });
    if let Some(a) = &fetched {
        ctx.album_cache.lock().await.insert(id.clone(), a.clone());
    }
    fetched
}

/// Fetches artist metadata by id, using the run's per-call cache.
pub async fn cached_artist(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    id: &ArtistId,
) -> Option<Artist> {
    {
        let cache = ctx.artist_cache.lock().await;
        if let Some(a) = cache.get(id) {
            return Some(a.clone());
        }
    }
    let fetched = client
        .fetch_item(&id.0)
        .await
        .ok()
        .and_then(|item| match item {
            crate::client::LibraryItem::Artist(a) => Some(a),
            _ => None,
        });
    if let Some(a) = &fetched {
        ctx.artist_cache.lock().await.insert(id.clone(), a.clone());
    }
    fetched
}
