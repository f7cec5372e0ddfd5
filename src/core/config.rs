//! Application-wide configuration constants and identifier newtypes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-call timeout for the Library Client (spec §4.1).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Pathfinder bounds (spec §4.6).
pub const JOURNEY_MAX_DEPTH: usize = 4;
pub const JOURNEY_WIDTH: usize = 15;
pub const JOURNEY_MAX_NODES: usize = 1300;

/// Smoother neighbor fan-out (spec §4.7).
pub const SMOOTHER_NEIGHBOR_LIMIT: usize = 50;

/// Over-fetch floor used by sonic album/artist mix so per-artist/per-album
/// caps don't starve the output (spec §4.3.3).
pub const SONIC_OVERFETCH_FLOOR: usize = 40;

/// Genre harvest caps (spec §4.3.2).
pub const GENRE_TRACK_SEARCH_LIMIT: usize = 1000;
pub const GENRE_TRACK_KEEP_LIMIT: usize = 100;
pub const GENRE_ALBUM_SEARCH_LIMIT: usize = 500;
pub const GENRE_ALBUM_WALK_LIMIT: usize = 50;
pub const GENRE_ALBUM_TRACK_KEEP_LIMIT: usize = 50;

/// Per-album keep limit for sonic album mix (spec §4.3.3).
pub const SONIC_ALBUM_TRACK_KEEP_LIMIT: usize = 6;
/// Per-artist keep limit for sonic artist mix (spec §4.3.4).
pub const SONIC_ARTIST_TRACK_KEEP_LIMIT: usize = 25;

/// Default name of the preset store directory, relative to the engine root
/// (spec §6), overridable with `PLAYLIST_ENGINE_PRESET_DIR`.
pub const PRESET_STORE_DIR: &str = "Playlist_Presets";

/// Default music library section name when a preset omits `pc_lib`.
pub const DEFAULT_MUSIC_LIBRARY: &str = "Music";

/// Stable identifier for a Track, as assigned by the Library Server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub String);

/// Stable identifier for an Album.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlbumId(pub String);

/// Stable identifier for an Artist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtistId(pub String);

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for AlbumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
