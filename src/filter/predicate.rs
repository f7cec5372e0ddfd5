//! The static-filter predicate (spec §4.5): a single pure-ish check (it does
//! lazily fetch album/artist metadata through the cache) applied eagerly by
//! most strategies and again in the final pass.

use super::{cached_album, cached_artist};
use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::TrackId;
use crate::domain::{PlaylistConfig, Track};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Accepted,
    Rejected(&'static str),
}

/// Preset-derived filter parameters, built once per stage.
pub struct StaticFilter<'a> {
    cfg: &'a PlaylistConfig,
    exclude_genres: HashSet<String>,
}

impl<'a> StaticFilter<'a> {
    pub fn new(cfg: &'a PlaylistConfig) -> Self {
        Self {
            cfg,
            exclude_genres: cfg.exclude_genres_lower(),
        }
    }

    /// Runs checks 1-9 of spec §4.5 in order, short-circuiting on the first
    /// rejection. `seen_ids` is the caller's running dedup set (shared across
    /// the harvest, not just this call).
    pub async fn check(
        &self,
        client: &dyn LibraryClient,
        ctx: &RunContext,
        track: &Track,
        seen_ids: &HashSet<TrackId>,
        excluded_keys: &HashSet<TrackId>,
    ) -> FilterOutcome {
        if seen_ids.contains(&track.id) {
            return FilterOutcome::Rejected("duplicate");
        }
        if excluded_keys.contains(&track.id) {
            return FilterOutcome::Rejected("excluded_key");
        }

        let album = match &track.album_id {
            Some(id) => cached_album(client, ctx, id).await,
            None => None,
        };
        let artist = match &track.artist_id {
            Some(id) => cached_artist(client, ctx, id).await,
            None => None,
        };

        if self.cfg.min_rating_track > 0.0 {
            match track.user_rating {
                None if !self.cfg.allow_unrated => return FilterOutcome::Rejected("unrated_track"),
                Some(r) if r < self.cfg.min_rating_track => {
                    return FilterOutcome::Rejected("min_rating_track")
                }
                _ => {}
            }
        }
        if self.cfg.min_rating_album > 0.0 {
            match album.as_ref().and_then(|a| a.user_rating) {
                None if !self.cfg.allow_unrated => return FilterOutcome::Rejected("unrated_album"),
                Some(r) if r < self.cfg.min_rating_album => {
                    return FilterOutcome::Rejected("min_rating_album")
                }
                _ => {}
            }
        }
        if self.cfg.min_rating_artist > 0.0 {
            match artist.as_ref().and_then(|a| a.user_rating) {
                None if !self.cfg.allow_unrated => {
                    return FilterOutcome::Rejected("unrated_artist")
                }
                Some(r) if r < self.cfg.min_rating_artist => {
                    return FilterOutcome::Rejected("min_rating_artist")
                }
                _ => {}
            }
        }

        if let Some(min_pc) = self.cfg.min_play_count() {
            if track.play_count < min_pc {
                return FilterOutcome::Rejected("min_play_count");
            }
        }
        if let Some(max_pc) = self.cfg.max_play_count() {
            if track.play_count > max_pc {
                return FilterOutcome::Rejected("max_play_count");
            }
        }

        if self.cfg.min_duration_sec > 0 || self.cfg.max_duration_sec > 0 {
            let dur = track.duration_ms / 1000;
            if self.cfg.min_duration_sec > 0 && dur < self.cfg.min_duration_sec {
                return FilterOutcome::Rejected("duration");
            }
            if self.cfg.max_duration_sec > 0 && dur > self.cfg.max_duration_sec {
                return FilterOutcome::Rejected("duration");
            }
        }

        if self.cfg.min_year > 0 || self.cfg.max_year > 0 {
            let year = album.as_ref().and_then(|a| a.effective_year()).or(track.year).unwrap_or(0);
            if year == 0 {
                return FilterOutcome::Rejected("year");
            }
            if self.cfg.min_year > 0 && year < self.cfg.min_year {
                return FilterOutcome::Rejected("year");
            }
            if self.cfg.max_year > 0 && year > self.cfg.max_year {
                return FilterOutcome::Rejected("year");
            }
        }

        let mut collections: HashSet<String> = track.collections.iter().cloned().collect();
        if let Some(a) = &album {
            collections.extend(a.collections.iter().cloned());
        }
        if let Some(a) = &artist {
            collections.extend(a.collections.iter().cloned());
        }

        if !self.cfg.include_collections.is_empty() {
            let included = self
                .cfg
                .include_collections
                .iter()
                .any(|c| collections.contains(c));
            if !included {
                return FilterOutcome::Rejected("not_included");
            }
        }
        if !self.cfg.exclude_collections.is_empty()
            && self.cfg.exclude_collections.iter().any(|c| collections.contains(c))
        {
            return FilterOutcome::Rejected("excluded_collection");
        }

        if !self.exclude_genres.is_empty() {
            let mut genres: HashSet<String> =
                track.genres.iter().map(|g| g.to_lowercase()).collect();
            if let Some(a) = &album {
                genres.extend(a.genres.iter().map(|g| g.to_lowercase()));
            }
            if let Some(a) = &artist {
                genres.extend(a.genres.iter().map(|g| g.to_lowercase()));
            }
            if genres.iter().any(|g| self.exclude_genres.contains(g)) {
                return FilterOutcome::Rejected("excluded_genre");
            }
        }

        FilterOutcome::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLibraryClient;
    use crate::core::config::TrackId;
    use chrono::Utc;

    fn track(id: &str) -> Track {
        Track {
            id: TrackId(id.to_string()),
            title: "T".into(),
            album_id: None,
            artist_id: None,
            artist_name: "A".into(),
            track_index: None,
            disc_index: None,
            duration_ms: 200_000,
            added_at: Utc::now(),
            user_rating: Some(8.0),
            play_count: 5,
            rating_count: 1,
            year: Some(2020),
            genres: vec!["Rock".into()],
            collections: vec![],
        }
    }

    #[tokio::test]
    async fn rejects_duplicates() {
        let cfg = PlaylistConfig::default();
        let cfg = PlaylistConfig { min_rating_track: 0.0, ..cfg };
        let filter = StaticFilter::new(&cfg);
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let t = track("1");
        let mut seen = HashSet::new();
        seen.insert(t.id.clone());
        let outcome = filter
            .check(&client, &ctx, &t, &seen, &HashSet::new())
            .await;
        assert_eq!(outcome, FilterOutcome::Rejected("duplicate"));
    }

    #[tokio::test]
    async fn rejects_unrated_when_not_allowed() {
        let cfg = PlaylistConfig {
            min_rating_track: 7.0,
            allow_unrated: false,
            ..PlaylistConfig::default()
        };
        let filter = StaticFilter::new(&cfg);
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let mut t = track("1");
        t.user_rating = None;
        let outcome = filter
            .check(&client, &ctx, &t, &HashSet::new(), &HashSet::new())
            .await;
        assert_eq!(outcome, FilterOutcome::Rejected("unrated_track"));
    }

    #[tokio::test]
    async fn rejects_excluded_genre_case_insensitively() {
        let cfg = PlaylistConfig {
            min_rating_track: 0.0,
            exclude_genres: vec!["rock".into()],
            ..PlaylistConfig::default()
        };
        let filter = StaticFilter::new(&cfg);
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let t = track("1");
        let outcome = filter
            .check(&client, &ctx, &t, &HashSet::new(), &HashSet::new())
            .await;
        assert_eq!(outcome, FilterOutcome::Rejected("excluded_genre"));
    }

    #[tokio::test]
    async fn accepts_when_nothing_configured() {
        let cfg = PlaylistConfig {
            min_rating_track: 0.0,
            ..PlaylistConfig::default()
        };
        let filter = StaticFilter::new(&cfg);
        let client = MockLibraryClient::new();
        let ctx = RunContext::new(Some(1));
        let t = track("1");
        let outcome = filter
            .check(&client, &ctx, &t, &HashSet::new(), &HashSet::new())
            .await;
        assert_eq!(outcome, FilterOutcome::Accepted);
    }
}
