//! Preset (Playlist Config) — spec §3, and the engine/UI shape conversion
//! described in spec §6 / SPEC_FULL §6.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The seed/expansion strategy a run uses (spec §3 `seed_mode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    History,
    Genre,
    SonicAlbumMix,
    SonicArtistMix,
    SonicCombo,
    TrackSonic,
    SonicHistory,
    SonicJourney,
    AlbumEchoes,
    StrictCollection,
    /// `""` / absent in the original payload — inferred from seeds/history.
    Auto,
}

impl SeedMode {
    /// Parses the engine-shape string value, including the empty-string alias
    /// for `Auto`. Unknown values are a configuration error (spec §7).
    pub fn parse(raw: &str) -> Result<Self, String> {
        Ok(match raw {
            "" | "auto" => SeedMode::Auto,
            "history" => SeedMode::History,
            "genre" => SeedMode::Genre,
            "sonic_album_mix" => SeedMode::SonicAlbumMix,
            "sonic_artist_mix" => SeedMode::SonicArtistMix,
            "sonic_combo" => SeedMode::SonicCombo,
            "track_sonic" => SeedMode::TrackSonic,
            "sonic_history" => SeedMode::SonicHistory,
            "sonic_journey" => SeedMode::SonicJourney,
            "album_echoes" => SeedMode::AlbumEchoes,
            "strict_collection" => SeedMode::StrictCollection,
            other => return Err(format!("unknown seed_mode: {other}")),
        })
    }

    /// Engine-shape string value, the inverse of `parse` (used in log lines
    /// and the playlist summary, spec §4.8).
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedMode::History => "history",
            SeedMode::Genre => "genre",
            SeedMode::SonicAlbumMix => "sonic_album_mix",
            SeedMode::SonicArtistMix => "sonic_artist_mix",
            SeedMode::SonicCombo => "sonic_combo",
            SeedMode::TrackSonic => "track_sonic",
            SeedMode::SonicHistory => "sonic_history",
            SeedMode::SonicJourney => "sonic_journey",
            SeedMode::AlbumEchoes => "album_echoes",
            SeedMode::StrictCollection => "strict_collection",
            SeedMode::Auto => "auto",
        }
    }

    /// Title-cased label used in the default playlist title (spec §4.8).
    pub fn title(&self) -> &'static str {
        match self {
            SeedMode::History => "History",
            SeedMode::Genre => "Genre",
            SeedMode::SonicAlbumMix => "Sonic Album Mix",
            SeedMode::SonicArtistMix => "Sonic Artist Mix",
            SeedMode::SonicCombo => "Sonic Combo",
            SeedMode::TrackSonic => "Track Sonic",
            SeedMode::SonicHistory => "Sonic History",
            SeedMode::SonicJourney => "Sonic Journey",
            SeedMode::AlbumEchoes => "Deep Dive",
            SeedMode::StrictCollection => "Strict Collection",
            SeedMode::Auto => "Auto",
        }
    }
}

/// Fallback strategy when explicit seed collection yields nothing (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedFallbackMode {
    History,
    Genre,
}

/// Wall-clock listening-time bucket (spec §3 Time Period).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    Morning,
    Afternoon,
    Evening,
    LateNight,
    Anytime,
}

impl TimePeriod {
    /// Derives the period from an hour-of-day (0..24), per spec §3.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimePeriod::Morning,
            12..=16 => TimePeriod::Afternoon,
            17..=21 => TimePeriod::Evening,
            22..=23 | 0..=5 => TimePeriod::LateNight,
            _ => TimePeriod::Anytime,
        }
    }

    /// Hours allowed for this period; `Anytime` allows every hour.
    pub fn allowed_hours(&self) -> HashSet<u32> {
        match self {
            TimePeriod::Morning => (6..=11).collect(),
            TimePeriod::Afternoon => (12..=16).collect(),
            TimePeriod::Evening => (17..=21).collect(),
            TimePeriod::LateNight => [22, 23, 0, 1, 2, 3, 4, 5].into_iter().collect(),
            TimePeriod::Anytime => (0..24).collect(),
        }
    }
}

/// Library Server connection details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    pub url: String,
    pub token: String,
    #[serde(default = "default_music_library")]
    pub music_library: String,
}

fn default_music_library() -> String {
    crate::core::config::DEFAULT_MUSIC_LIBRARY.to_string()
}

/// The full set of recognized playlist-generation options (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    pub seed_mode: String,
    pub seed_fallback_mode: SeedFallbackMode,
    pub custom_title: Option<String>,
    pub preset_name: Option<String>,

    pub max_tracks: usize,
    pub history_lookback_days: i64,
    pub exclude_played_days: i64,
    pub sonic_similar_limit: usize,
    pub historical_ratio: f64,
    pub exploit_weight: f64,

    pub recently_added_days: i64,
    pub recently_added_weight: f64,

    pub min_rating_track: f32,
    pub min_rating_album: f32,
    pub min_rating_artist: f32,
    pub allow_unrated: bool,

    pub min_play_count: i64,
    pub max_play_count: i64,

    pub min_year: u32,
    pub max_year: u32,
    pub min_duration_sec: u64,
    pub max_duration_sec: u64,

    pub max_tracks_per_artist: usize,
    pub max_tracks_per_album: usize,

    pub history_min_rating: f32,
    pub history_max_play_count: i64,

    pub include_collections: Vec<String>,
    pub exclude_collections: Vec<String>,
    pub exclude_genres: Vec<String>,

    pub genre_seeds: Vec<String>,
    pub genre_strict: bool,
    pub allow_off_genre_fraction: f64,

    pub seed_track_keys: Vec<String>,
    pub seed_artist_names: Vec<String>,
    pub seed_playlist_names: Vec<String>,
    pub seed_collection_names: Vec<String>,

    pub sonic_smoothing: bool,
    pub use_time_periods: bool,
    pub deep_dive_target: usize,

    /// Recovered from the original implementation: tunable recency/legacy
    /// mix for Strict Collection scoring (spec §4.3.10 "slider").
    pub legacy_vs_recency_slider: f64,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        PlaylistConfig {
            seed_mode: String::new(),
            seed_fallback_mode: SeedFallbackMode::History,
            custom_title: None,
            preset_name: None,
            max_tracks: 50,
            history_lookback_days: 30,
            exclude_played_days: 3,
            sonic_similar_limit: 20,
            historical_ratio: 0.3,
            exploit_weight: 0.7,
            recently_added_days: 0,
            recently_added_weight: 1.0,
            min_rating_track: 7.0,
            min_rating_album: 0.0,
            min_rating_artist: 0.0,
            allow_unrated: false,
            min_play_count: -1,
            max_play_count: -1,
            min_year: 0,
            max_year: 0,
            min_duration_sec: 0,
            max_duration_sec: 0,
            max_tracks_per_artist: 0,
            max_tracks_per_album: 0,
            history_min_rating: 0.0,
            history_max_play_count: -1,
            include_collections: Vec::new(),
            exclude_collections: Vec::new(),
            exclude_genres: Vec::new(),
            genre_seeds: Vec::new(),
            genre_strict: false,
            allow_off_genre_fraction: 0.2,
            seed_track_keys: Vec::new(),
            seed_artist_names: Vec::new(),
            seed_playlist_names: Vec::new(),
            seed_collection_names: Vec::new(),
            sonic_smoothing: false,
            use_time_periods: false,
            deep_dive_target: 15,
            legacy_vs_recency_slider: 0.5,
        }
    }
}

impl PlaylistConfig {
    pub fn seed_mode(&self) -> Result<SeedMode, String> {
        SeedMode::parse(&self.seed_mode)
    }

    pub fn min_play_count(&self) -> Option<u64> {
        if self.min_play_count < 0 {
            None
        } else {
            Some(self.min_play_count as u64)
        }
    }

    pub fn max_play_count(&self) -> Option<u64> {
        if self.max_play_count < 0 {
            None
        } else {
            Some(self.max_play_count as u64)
        }
    }

    pub fn history_max_play_count(&self) -> Option<u64> {
        if self.history_max_play_count < 0 {
            None
        } else {
            Some(self.history_max_play_count as u64)
        }
    }

    pub fn exclude_genres_lower(&self) -> HashSet<String> {
        self.exclude_genres.iter().map(|g| g.to_lowercase()).collect()
    }
}

/// Engine-shape preset: `{ "plex": {...}, "playlist": {...} }` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub plex: PlexConfig,
    pub playlist: PlaylistConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_mode_parses_empty_as_auto() {
        assert_eq!(SeedMode::parse("").unwrap(), SeedMode::Auto);
    }

    #[test]
    fn seed_mode_rejects_unknown_values() {
        assert!(SeedMode::parse("not_a_mode").is_err());
    }

    #[test]
    fn time_period_boundaries() {
        assert!(matches!(TimePeriod::from_hour(6), TimePeriod::Morning));
        assert!(matches!(TimePeriod::from_hour(11), TimePeriod::Morning));
        assert!(matches!(TimePeriod::from_hour(12), TimePeriod::Afternoon));
        assert!(matches!(TimePeriod::from_hour(22), TimePeriod::LateNight));
        assert!(matches!(TimePeriod::from_hour(3), TimePeriod::LateNight));
    }

    #[test]
    fn sentinel_play_counts_mean_unbounded() {
        let cfg = PlaylistConfig::default();
        assert_eq!(cfg.min_play_count(), None);
        assert_eq!(cfg.max_play_count(), None);
    }

    #[test]
    fn default_matches_original_script_defaults() {
        let cfg = PlaylistConfig::default();
        assert_eq!(cfg.max_tracks, 50);
        assert_eq!(cfg.exploit_weight, 0.7);
        assert_eq!(cfg.historical_ratio, 0.3);
        assert_eq!(cfg.min_rating_track, 7.0);
        assert_eq!(cfg.allow_off_genre_fraction, 0.2);
        assert_eq!(cfg.deep_dive_target, 15);
    }
}
