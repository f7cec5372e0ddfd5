//! Per-run context: caches and counters created at run start, discarded at
//! end (spec §9 design note — not a process-wide singleton).

use crate::core::config::{AlbumId, ArtistId};
use crate::domain::{Album, Artist};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;

/// Tally of why a candidate was rejected, merged from per-stage local
/// counters at the end of the filter pass (spec §5, §7).
#[derive(Debug, Default, Clone)]
pub struct RejectCounter {
    counts: HashMap<&'static str, usize>,
}

impl RejectCounter {
    pub fn bump(&mut self, reason: &'static str) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: &RejectCounter) {
        for (reason, n) in &other.counts {
            *self.counts.entry(reason).or_insert(0) += n;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn as_sorted_pairs(&self) -> Vec<(&'static str, usize)> {
        let mut pairs: Vec<_> = self.counts.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        pairs
    }
}

/// Caches and RNG shared across a single generation run. Lives only for the
/// duration of `run()`; never reused across requests.
pub struct RunContext {
    pub album_cache: Mutex<HashMap<AlbumId, Album>>,
    pub artist_cache: Mutex<HashMap<ArtistId, Artist>>,
    pub rejects: std::sync::Mutex<RejectCounter>,
    pub rng: std::sync::Mutex<StdRng>,
    pub started_at: Instant,
}

impl RunContext {
    /// `seed` injects determinism for testable property #11; `None` seeds
    /// from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            album_cache: Mutex::new(HashMap::new()),
            artist_cache: Mutex::new(HashMap::new()),
            rejects: std::sync::Mutex::new(RejectCounter::default()),
            rng: std::sync::Mutex::new(rng),
            started_at: Instant::now(),
        }
    }

    pub fn bump_reject(&self, reason: &'static str) {
        self.rejects.lock().unwrap().bump(reason);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
