//! History Blend post-step (spec §4.3.11): appended to every mode except
//! strict_collection, sonic_history, and history itself.

use crate::context::RunContext;
use crate::domain::{PlaylistConfig, SeedMode, Track};
use rand::seq::SliceRandom;

pub fn apply_history_blend(
    pool: &mut Vec<Track>,
    ctx: &RunContext,
    history_seeds: &[Track],
    cfg: &PlaylistConfig,
    mode: SeedMode,
) {
    if matches!(
        mode,
        SeedMode::StrictCollection | SeedMode::SonicHistory | SeedMode::History
    ) {
        return;
    }
    if cfg.historical_ratio <= 0.0 || history_seeds.is_empty() {
        return;
    }
    let n = ((cfg.max_tracks as f64) * cfg.historical_ratio).floor() as usize;
    if n == 0 {
        return;
    }
    let mut shuffled = history_seeds.to_vec();
    {
        let mut rng = ctx.rng.lock().unwrap();
        shuffled.shuffle(&mut *rng);
    }
    pool.extend(shuffled.into_iter().take(n));
}
