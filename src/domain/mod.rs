//! Core data model (spec §3): entities, the fuzzy fingerprint, and presets.

pub mod album;
pub mod artist;
pub mod fingerprint;
pub mod preset;
pub mod track;

pub use album::{Album, RawAlbum};
pub use artist::{Artist, RawArtist};
pub use fingerprint::fuzzy_fingerprint;
pub use preset::{PlaylistConfig, PlexConfig, Preset, SeedFallbackMode, SeedMode, TimePeriod};
pub use track::{RawTrack, Track};

/// Ordered, first-seen-dedup collection of seed tracks (spec §3 Seed Set).
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    pub tracks: Vec<Track>,
}

impl SeedSet {
    pub fn push_unique(&mut self, track: Track) {
        if !self.tracks.iter().any(|t| t.id == track.id) {
            self.tracks.push(track);
        }
    }

    pub fn ids(&self) -> std::collections::HashSet<crate::core::config::TrackId> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Ordered collection of candidate tracks produced by an expansion strategy
/// (spec §3 Candidate Pool). May contain duplicates across strategies.
pub type CandidatePool = Vec<Track>;
