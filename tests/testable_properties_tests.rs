//! Covers the numbered invariants of spec §8 not already exercised by the
//! literal scenarios in `pipeline_scenarios_tests.rs`.

use chrono::{Duration, Utc};
use playlist_engine::client::{HistoryEntry, MockLibraryClient};
use playlist_engine::core::config::{ArtistId, TrackId};
use playlist_engine::core::logging::ProgressReporter;
use playlist_engine::domain::{PlaylistConfig, PlexConfig, Preset, Track};
use playlist_engine::pipeline;
use std::collections::HashSet;

/// #13: the smoother never runs for sonic_journey, even with
/// `sonic_smoothing=true` — flipping that flag must not change the order a
/// journey comes out in, since a smoother run would consume RNG state and
/// reorder via neighbor lookups.
#[tokio::test]
async fn smoother_is_a_no_op_under_sonic_journey() {
    let mut client = MockLibraryClient::new()
        .with_track(track("1001", "A", "Seed One"))
        .with_track(track("1002", "A", "Seed Two"))
        .with_track(track("A", "A", "Bridge A"))
        .with_track(track("B", "A", "Bridge B"));
    for i in 1..=5 {
        client = client
            .with_track(track(&format!("P{i}"), "A", &format!("P{i}")))
            .with_track(track(&format!("Q{i}"), "A", &format!("Q{i}")));
    }
    client = client
        .with_sonic_similar_tracks(
            TrackId("1001".into()),
            vec![
                TrackId("A".into()),
                TrackId("P1".into()),
                TrackId("P2".into()),
                TrackId("P3".into()),
                TrackId("P4".into()),
                TrackId("P5".into()),
            ],
        )
        .with_sonic_similar_tracks(
            TrackId("A".into()),
            vec![
                TrackId("1002".into()),
                TrackId("Q1".into()),
                TrackId("Q2".into()),
                TrackId("Q3".into()),
                TrackId("Q4".into()),
                TrackId("Q5".into()),
            ],
        );

    let base = PlaylistConfig {
        seed_mode: "sonic_journey".into(),
        seed_track_keys: vec!["1001".into(), "1002".into()],
        max_tracks: 12,
        ..permissive_playlist_config()
    };

    let preset_unsmoothed = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            sonic_smoothing: false,
            ..base.clone()
        },
    };
    let preset_smoothed = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            sonic_smoothing: true,
            ..base
        },
    };

    let without = run_pipeline(&client, &preset_unsmoothed).await;
    let with = run_pipeline(&client, &preset_smoothed).await;

    let ids_without: Vec<&str> = without.tracks.iter().map(|t| t.id.0.as_str()).collect();
    let ids_with: Vec<&str> = with.tracks.iter().map(|t| t.id.0.as_str()).collect();
    assert_eq!(ids_without, ids_with);
}

fn base_plex() -> PlexConfig {
    PlexConfig {
        url: "http://library.local".into(),
        token: "token".into(),
        music_library: "Music".into(),
    }
}

fn track(id: &str, artist: &str, title: &str) -> Track {
    Track {
        id: TrackId(id.to_string()),
        title: title.to_string(),
        album_id: None,
        artist_id: Some(ArtistId(artist.to_string())),
        artist_name: artist.to_string(),
        track_index: None,
        disc_index: None,
        duration_ms: 200_000,
        added_at: Utc::now(),
        user_rating: Some(8.0),
        play_count: 3,
        rating_count: 1,
        year: Some(2020),
        genres: vec![],
        collections: vec![],
    }
}

fn permissive_playlist_config() -> PlaylistConfig {
    PlaylistConfig {
        min_rating_track: 0.0,
        allow_unrated: true,
        historical_ratio: 0.0,
        ..PlaylistConfig::default()
    }
}

async fn run_pipeline(client: &MockLibraryClient, preset: &Preset) -> pipeline::RunOutcome {
    let progress = ProgressReporter::new(true);
    pipeline::run(client, preset, Some(1), true, &progress)
        .await
        .unwrap()
}

/// #1: final length never exceeds max_tracks, even with abundant supply.
#[tokio::test]
async fn size_never_exceeds_max_tracks() {
    let mut client = MockLibraryClient::new();
    let mut entries = Vec::new();
    let since = Utc::now() - Duration::days(10);
    for i in 0..12 {
        let t = track(&format!("h{i}"), "A", &format!("Song {i}"));
        client = client.with_track(t.clone());
        entries.push(HistoryEntry {
            rating_key: t.id.clone(),
            viewed_at: since,
        });
    }
    client = client.with_history(entries);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "history".into(),
            max_tracks: 5,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert!(outcome.tracks.len() <= 5);
    assert_eq!(outcome.tracks.len(), 5);
}

/// #2: a per-artist cap is never exceeded, even when supply and max_tracks
/// would otherwise allow more.
#[tokio::test]
async fn artist_cap_is_never_exceeded() {
    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    for i in 0..10 {
        let t = track(&format!("z{i}"), "Z", &format!("Song {i}"));
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    client = client
        .with_artist_search("Z", vec![ArtistId("Z".into())])
        .with_artist_tracks(ArtistId("Z".into()), ids);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "sonic_artist_mix".into(),
            seed_artist_names: vec!["Z".into()],
            max_tracks_per_artist: 2,
            max_tracks: 10,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert_eq!(outcome.tracks.len(), 2);
}

/// #3: a per-album cap is never exceeded, even with enough per-artist
/// headroom to otherwise keep going.
#[tokio::test]
async fn album_cap_is_never_exceeded() {
    use playlist_engine::core::config::AlbumId;

    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    for i in 0..8 {
        let mut t = track(&format!("al{i}"), "Various", &format!("Song {i}"));
        t.album_id = Some(AlbumId("Alb".into()));
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    client = client.with_album_tracks(AlbumId("Alb".into()), ids.clone());
    client = client.with_track({
        let mut seed = track("seed", "Various", "Seed");
        seed.album_id = Some(AlbumId("Alb".into()));
        seed
    });

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "sonic_album_mix".into(),
            seed_track_keys: vec!["seed".into()],
            max_tracks_per_album: 3,
            max_tracks: 10,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert_eq!(outcome.tracks.len(), 3);
}

/// #4 / #14: identical-id duplicates can't occur (enforced by the pool
/// being id-keyed), and fuzzy-fingerprint duplicates collapse to the
/// first-seen entry.
#[tokio::test]
async fn fuzzy_duplicates_collapse_to_first_seen() {
    let mut client = MockLibraryClient::new();
    let first = track("h0", "Artist", "Great Song");
    let live_variant = track("h1", "Artist", "Great Song (Live at Wembley)");
    client = client.with_track(first.clone()).with_track(live_variant.clone());

    let since = Utc::now() - Duration::days(10);
    client = client.with_history(vec![
        HistoryEntry {
            rating_key: first.id.clone(),
            viewed_at: since,
        },
        HistoryEntry {
            rating_key: live_variant.id.clone(),
            viewed_at: since,
        },
    ]);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "history".into(),
            max_tracks: 10,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert_eq!(outcome.tracks.len(), 1);
    assert_eq!(outcome.tracks[0].id, first.id);

    let ids: HashSet<TrackId> = outcome.tracks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), outcome.tracks.len());
}

/// #5: a recently-played track is excluded from the final list even when it
/// is otherwise a perfectly good candidate surfaced by expansion.
#[tokio::test]
async fn recently_played_track_is_excluded() {
    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    for i in 0..4 {
        let t = track(&format!("z{i}"), "Z", &format!("Song {i}"));
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    let excluded = track("ex1", "Z", "Recently Played");
    ids.push(excluded.id.clone());
    client = client.with_track(excluded.clone());
    client = client
        .with_artist_search("Z", vec![ArtistId("Z".into())])
        .with_artist_tracks(ArtistId("Z".into()), ids)
        .with_history(vec![HistoryEntry {
            rating_key: excluded.id.clone(),
            viewed_at: Utc::now() - Duration::days(1),
        }]);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "sonic_artist_mix".into(),
            seed_artist_names: vec!["Z".into()],
            max_tracks: 10,
            exclude_played_days: 3,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert_eq!(outcome.tracks.len(), 4);
    assert!(!outcome.tracks.iter().any(|t| t.id == excluded.id));
}

/// #6: with genre strictness on, the off-genre share of the final list never
/// exceeds the configured quota, however the ranking happens to land.
#[tokio::test]
async fn off_genre_quota_is_respected() {
    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    for i in 0..15 {
        let mut t = track(&format!("jz{i}"), "Z", &format!("Jazz {i}"));
        t.genres = vec!["Jazz".into()];
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    for i in 0..15 {
        let mut t = track(&format!("pop{i}"), "Z", &format!("Pop {i}"));
        t.genres = vec!["Pop".into()];
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    client = client
        .with_artist_search("Z", vec![ArtistId("Z".into())])
        .with_artist_tracks(ArtistId("Z".into()), ids);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "sonic_artist_mix".into(),
            seed_artist_names: vec!["Z".into()],
            genre_seeds: vec!["Jazz".into()],
            genre_strict: true,
            allow_off_genre_fraction: 0.2,
            max_tracks: 10,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    let off_genre = outcome
        .tracks
        .iter()
        .filter(|t| !t.genres.iter().any(|g| g.eq_ignore_ascii_case("jazz")))
        .count();
    assert!(off_genre <= 2);
}

/// #7 / #8: include_collections keeps only matching tracks; exclude_genres
/// keeps out every matching one, at any of the three levels the filter
/// checks.
#[tokio::test]
async fn collection_and_genre_filters_are_enforced() {
    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    for i in 0..5 {
        let mut t = track(&format!("fav{i}"), "Z", &format!("Favorite {i}"));
        t.collections = vec!["Favorites".into()];
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    for i in 0..5 {
        let mut t = track(&format!("other{i}"), "Z", &format!("Other {i}"));
        t.collections = vec!["Unsorted".into()];
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    for i in 0..5 {
        let mut t = track(&format!("pop{i}"), "Z", &format!("Pop {i}"));
        t.collections = vec!["Favorites".into()];
        t.genres = vec!["Pop".into()];
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    client = client
        .with_artist_search("Z", vec![ArtistId("Z".into())])
        .with_artist_tracks(ArtistId("Z".into()), ids);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "sonic_artist_mix".into(),
            seed_artist_names: vec!["Z".into()],
            include_collections: vec!["Favorites".into()],
            exclude_genres: vec!["Pop".into()],
            max_tracks: 20,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert!(!outcome.tracks.is_empty());
    for t in &outcome.tracks {
        assert!(t.collections.iter().any(|c| c == "Favorites"));
        assert!(!t.genres.iter().any(|g| g.eq_ignore_ascii_case("pop")));
    }
}

/// #9: the rating gate (with `allow_unrated=false`) keeps only tracks rated
/// at or above the configured minimum.
#[tokio::test]
async fn rating_gate_excludes_low_and_unrated_tracks() {
    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    for (i, rating) in [Some(9.0), Some(8.0), Some(5.0), None, Some(6.5)].into_iter().enumerate() {
        let mut t = track(&format!("r{i}"), "Z", &format!("Song {i}"));
        t.user_rating = rating;
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    client = client
        .with_artist_search("Z", vec![ArtistId("Z".into())])
        .with_artist_tracks(ArtistId("Z".into()), ids);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "sonic_artist_mix".into(),
            seed_artist_names: vec!["Z".into()],
            min_rating_track: 7.0,
            allow_unrated: false,
            max_tracks: 10,
            historical_ratio: 0.0,
            ..PlaylistConfig::default()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert_eq!(outcome.tracks.len(), 2);
    for t in &outcome.tracks {
        assert!(t.user_rating.unwrap() >= 7.0);
    }
}

/// #10: duration and year bounds, when configured, are honored by every
/// surviving track.
#[tokio::test]
async fn duration_and_year_bounds_are_enforced() {
    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    let specs = [
        (120_000u64, 2019u32),
        (200_000, 2020),
        (600_000, 2020),
        (200_000, 1990),
        (200_000, 2020),
    ];
    for (i, (dur, year)) in specs.into_iter().enumerate() {
        let mut t = track(&format!("d{i}"), "Z", &format!("Song {i}"));
        t.duration_ms = dur;
        t.year = Some(year);
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    client = client
        .with_artist_search("Z", vec![ArtistId("Z".into())])
        .with_artist_tracks(ArtistId("Z".into()), ids);

    let preset = Preset {
        plex: base_plex(),
        playlist: PlaylistConfig {
            seed_mode: "sonic_artist_mix".into(),
            seed_artist_names: vec!["Z".into()],
            min_duration_sec: 150,
            max_duration_sec: 500,
            min_year: 2000,
            max_year: 2025,
            max_tracks: 10,
            ..permissive_playlist_config()
        },
    };

    let outcome = run_pipeline(&client, &preset).await;
    assert_eq!(outcome.tracks.len(), 2);
    for t in &outcome.tracks {
        let dur_sec = t.duration_ms / 1000;
        assert!(dur_sec >= 150 && dur_sec <= 500);
        assert!(t.year.unwrap() >= 2000 && t.year.unwrap() <= 2025);
    }
}

/// #15: when collection yields zero seeds, the configured fallback mode
/// kicks in, and a genre fallback with no configured genre seeds defaults to
/// "Rock".
#[tokio::test]
async fn empty_seed_collection_falls_back_to_rock_genre() {
    let mut client = MockLibraryClient::new();
    let mut ids = Vec::new();
    for i in 0..6 {
        let t = track(&format!("rock{i}"), "Rockers", &format!("Anthem {i}"));
        ids.push(t.id.clone());
        client = client.with_track(t);
    }
    client = client.with_genre_tracks("rock", ids);

    let ctx = playlist_engine::context::RunContext::new(Some(1));
    let cfg = PlaylistConfig {
        seed_fallback_mode: playlist_engine::domain::SeedFallbackMode::Genre,
        max_tracks: 10,
        ..permissive_playlist_config()
    };
    let result = playlist_engine::seeds::collect_seeds(
        &client,
        &ctx,
        &cfg,
        None,
        playlist_engine::domain::SeedMode::SonicArtistMix,
    )
    .await;

    assert!(!result.seeds.tracks.is_empty());
    assert!(result
        .seeds
        .tracks
        .iter()
        .all(|t| t.artist_name == "Rockers"));
}
