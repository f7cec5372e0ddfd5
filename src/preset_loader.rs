//! Preset Loader (spec §6, SPEC_FULL §6): reads a Preset from a file, the
//! preset store, or stdin, and normalizes UI-shaped records into the
//! engine shape using the literal mapping recovered from the original
//! `convert_preset_to_payload`.

use crate::core::config::PRESET_STORE_DIR;
use crate::core::errors::EngineError;
use crate::domain::{PlaylistConfig, PlexConfig, Preset, SeedFallbackMode};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

pub enum PresetSource {
    File(PathBuf),
    Name(String),
    Stdin,
}

fn preset_store_dir() -> PathBuf {
    std::env::var("PLAYLIST_ENGINE_PRESET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(PRESET_STORE_DIR))
}

pub fn preset_path_for_name(name: &str) -> PathBuf {
    preset_store_dir().join(format!("{name}.json"))
}

/// Lists preset names found in the preset store (for `presets list`).
pub fn list_preset_names() -> std::io::Result<Vec<String>> {
    let dir = preset_store_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn read_source(source: PresetSource) -> Result<String, EngineError> {
    match source {
        PresetSource::File(path) => std::fs::read_to_string(&path).map_err(EngineError::from),
        PresetSource::Name(name) => {
            let path = preset_path_for_name(&name);
            std::fs::read_to_string(&path).map_err(EngineError::from)
        }
        PresetSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(EngineError::from)?;
            Ok(buf)
        }
    }
}

/// Loads and normalizes a preset from `source` into engine shape.
pub fn load_preset(source: PresetSource) -> Result<Preset, EngineError> {
    let text = read_source(source)?;
    let value: Value = serde_json::from_str(&text)?;
    normalize(&value)
}

fn is_ui_shape(value: &Value) -> bool {
    value
        .as_object()
        .map(|obj| obj.keys().any(|k| k.starts_with("pc_")))
        .unwrap_or(false)
}

fn normalize(value: &Value) -> Result<Preset, EngineError> {
    let mut preset = if is_ui_shape(value) {
        convert_ui_to_engine(value)
    } else {
        serde_json::from_value(value.clone())?
    };
    apply_env_overrides(&mut preset.plex);
    Ok(preset)
}

fn apply_env_overrides(plex: &mut PlexConfig) {
    if plex.url.is_empty() {
        if let Ok(url) = std::env::var("PLEX_URL").or_else(|_| std::env::var("PLEX_BASEURL")) {
            plex.url = url;
        }
    }
    if plex.token.is_empty() {
        if let Ok(token) = std::env::var("PLEX_TOKEN") {
            plex.token = token;
        }
    }
}

/// The literal label → engine seed_mode mapping from the original script's
/// `seed_mode_map` (spec/SPEC_FULL §6).
fn seed_mode_for_label(label: &str) -> &'static str {
    match label {
        "Auto (infer from seeds/history)" => "",
        "Deep Dive (Seed Albums)" => "album_echoes",
        "History + Seeds (Union)" => "history",
        "Genre seeds" => "genre",
        "Sonic Artist Mix" => "sonic_artist_mix",
        "Sonic Album Mix" => "sonic_album_mix",
        "Sonic Tracks Mix" => "track_sonic",
        "Sonic Combo (Albums + Artists)" => "sonic_combo",
        "Sonic History (Intersection)" => "sonic_history",
        "Strict Collection" => "strict_collection",
        _ => "history",
    }
}

fn str_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn list_field(obj: &serde_json::Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn bool_field(obj: &serde_json::Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

fn int_field(obj: &serde_json::Map<String, Value>, key: &str, default: i64) -> i64 {
    obj.get(key).and_then(|v| v.as_i64()).unwrap_or(default)
}

fn float_field(obj: &serde_json::Map<String, Value>, key: &str, default: f64) -> f64 {
    obj.get(key).and_then(|v| v.as_f64()).unwrap_or(default)
}

/// Converts a UI-shape record (`pc_*` keys) to engine shape, reproducing
/// `convert_preset_to_payload` field-for-field (SPEC_FULL §6).
fn convert_ui_to_engine(value: &Value) -> Preset {
    let empty = serde_json::Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    let seed_mode_label = str_field(obj, "pc_seed_mode_label").unwrap_or_default();
    let seed_mode = seed_mode_for_label(&seed_mode_label).to_string();

    let seed_fallback_mode = match str_field(obj, "pc_seed_fallback_mode").as_deref() {
        Some("genre") => SeedFallbackMode::Genre,
        _ => SeedFallbackMode::History,
    };

    let playlist = PlaylistConfig {
        seed_mode,
        seed_fallback_mode,
        custom_title: str_field(obj, "pc_custom_title"),
        preset_name: str_field(obj, "pc_preset_name"),
        max_tracks: int_field(obj, "pc_max_tracks", 50).max(0) as usize,
        history_lookback_days: int_field(obj, "pc_lookback_days", 30),
        exclude_played_days: int_field(obj, "pc_exclude_days", 3),
        sonic_similar_limit: int_field(obj, "pc_sonic_limit", 20).max(0) as usize,
        historical_ratio: float_field(obj, "pc_hist_ratio", 0.3),
        exploit_weight: float_field(obj, "pc_explore_exploit", 0.7),
        recently_added_days: int_field(obj, "pc_recent_days", 0),
        recently_added_weight: float_field(obj, "pc_recent_weight", 0.0),
        min_rating_track: float_field(obj, "pc_min_track", 7.0) as f32,
        min_rating_album: float_field(obj, "pc_min_album", 0.0) as f32,
        min_rating_artist: float_field(obj, "pc_min_artist", 0.0) as f32,
        allow_unrated: bool_field(obj, "pc_allow_unrated"),
        min_play_count: int_field(obj, "pc_min_play_count", -1),
        max_play_count: int_field(obj, "pc_max_play_count", -1),
        min_year: int_field(obj, "pc_min_year", 0).max(0) as u32,
        max_year: int_field(obj, "pc_max_year", 0).max(0) as u32,
        min_duration_sec: int_field(obj, "pc_min_duration", 0).max(0) as u64,
        max_duration_sec: int_field(obj, "pc_max_duration", 0).max(0) as u64,
        max_tracks_per_artist: int_field(obj, "pc_max_artist", 0).max(0) as usize,
        max_tracks_per_album: int_field(obj, "pc_max_album", 0).max(0) as usize,
        history_min_rating: float_field(obj, "pc_hist_min_rating", 0.0) as f32,
        history_max_play_count: int_field(obj, "pc_hist_max_play_count", -1),
        include_collections: list_field(obj, "pc_include_collections"),
        exclude_collections: list_field(obj, "pc_exclude_collections"),
        exclude_genres: list_field(obj, "pc_exclude_genres"),
        genre_seeds: list_field(obj, "pc_seed_genres"),
        genre_strict: bool_field(obj, "pc_genre_strict"),
        allow_off_genre_fraction: float_field(obj, "pc_allow_off_genre", 0.2),
        seed_track_keys: list_field(obj, "pc_seed_tracks"),
        seed_artist_names: list_field(obj, "pc_seed_artists"),
        seed_playlist_names: list_field(obj, "pc_seed_playlists"),
        seed_collection_names: list_field(obj, "pc_seed_collections"),
        sonic_smoothing: bool_field(obj, "pc_sonic_smoothing"),
        use_time_periods: bool_field(obj, "pc_use_periods"),
        deep_dive_target: int_field(obj, "pc_deep_dive_target", 15).max(0) as usize,
        legacy_vs_recency_slider: 0.5,
    };

    let plex = PlexConfig {
        url: String::new(),
        token: String::new(),
        music_library: str_field(obj, "pc_lib").unwrap_or_else(|| "Music".to_string()),
    };

    Preset { plex, playlist }
}
