//! Preset Loader integration tests (spec §6): file-based loading for both
//! preset shapes, plus the PLEX_* environment-variable override path.

use playlist_engine::preset_loader::{self, PresetSource};
use std::io::Write;

fn write_temp_json(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp preset file");
    file.write_all(contents.as_bytes()).expect("write temp preset file");
    file
}

#[test]
fn loads_engine_shape_preset_from_file() {
    let file = write_temp_json(
        r#"{
            "plex": {"url": "http://library.local", "token": "tok", "music_library": "Music"},
            "playlist": {"seed_mode": "sonic_artist_mix", "max_tracks": 30}
        }"#,
    );

    let preset = preset_loader::load_preset(PresetSource::File(file.path().to_path_buf())).unwrap();
    assert_eq!(preset.playlist.seed_mode, "sonic_artist_mix");
    assert_eq!(preset.playlist.max_tracks, 30);
    assert_eq!(preset.plex.url, "http://library.local");
}

#[test]
fn loads_ui_shape_preset_from_file_and_converts_it() {
    let file = write_temp_json(
        r#"{
            "pc_seed_mode_label": "Sonic History (Intersection)",
            "pc_max_tracks": 15,
            "pc_min_track": 8.5,
            "pc_seed_tracks": "1001, 1002"
        }"#,
    );

    let preset = preset_loader::load_preset(PresetSource::File(file.path().to_path_buf())).unwrap();
    assert_eq!(preset.playlist.seed_mode, "sonic_history");
    assert_eq!(preset.playlist.max_tracks, 15);
    assert_eq!(preset.playlist.min_rating_track, 8.5);
    assert_eq!(preset.playlist.seed_track_keys, vec!["1001", "1002"]);
}

#[test]
fn missing_preset_file_is_a_config_style_io_error() {
    let missing = std::path::PathBuf::from("/nonexistent/path/to/preset.json");
    let result = preset_loader::load_preset(PresetSource::File(missing));
    assert!(result.is_err());
}

#[test]
fn malformed_json_is_rejected() {
    let file = write_temp_json("not valid json at all");
    let result = preset_loader::load_preset(PresetSource::File(file.path().to_path_buf()));
    assert!(result.is_err());
}

/// Env-var overrides only fill in a blank `plex.url`/`plex.token` — exercised
/// in one test function to avoid cross-test races over process-global env.
#[test]
fn env_overrides_fill_blank_credentials_only() {
    let blank_file = write_temp_json(r#"{"plex": {"url": "", "token": ""}, "playlist": {}}"#);
    let filled_file = write_temp_json(
        r#"{"plex": {"url": "http://already-set", "token": "already-set"}, "playlist": {}}"#,
    );

    std::env::set_var("PLEX_URL", "http://from-env");
    std::env::set_var("PLEX_TOKEN", "token-from-env");

    let blank = preset_loader::load_preset(PresetSource::File(blank_file.path().to_path_buf())).unwrap();
    assert_eq!(blank.plex.url, "http://from-env");
    assert_eq!(blank.plex.token, "token-from-env");

    let filled =
        preset_loader::load_preset(PresetSource::File(filled_file.path().to_path_buf())).unwrap();
    assert_eq!(filled.plex.url, "http://already-set");
    assert_eq!(filled.plex.token, "already-set");

    std::env::remove_var("PLEX_URL");
    std::env::remove_var("PLEX_TOKEN");
}

/// Both the preset store listing and by-name loading key off the same
/// `PLAYLIST_ENGINE_PRESET_DIR` env var — kept in one test function to avoid
/// a cross-test race over that process-global state.
#[test]
fn preset_store_directory_is_listed_and_loaded_by_name() {
    let dir = tempfile::tempdir().expect("create temp preset dir");
    std::fs::write(dir.path().join("chill.json"), "{}").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
    std::fs::write(
        dir.path().join("road_trip.json"),
        r#"{"plex": {"url": "http://x", "token": "t"}, "playlist": {"seed_mode": "genre"}}"#,
    )
    .unwrap();

    std::env::set_var("PLAYLIST_ENGINE_PRESET_DIR", dir.path());
    let names = preset_loader::list_preset_names().unwrap();
    let preset = preset_loader::load_preset(PresetSource::Name("road_trip".to_string())).unwrap();
    std::env::remove_var("PLAYLIST_ENGINE_PRESET_DIR");

    assert_eq!(names, vec!["chill".to_string(), "road_trip".to_string()]);
    assert_eq!(preset.playlist.seed_mode, "genre");
}
