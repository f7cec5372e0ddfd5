//! Pipeline (spec §5, §6): orchestrates the whole run end to end.

use crate::client::LibraryClient;
use crate::context::RunContext;
use crate::core::config::TrackId;
use crate::core::errors::EngineError;
use crate::core::logging::ProgressReporter;
use crate::domain::{fuzzy_fingerprint, CandidatePool, Preset, SeedMode, TimePeriod, Track};
use crate::filter::{FilterOutcome, StaticFilter};
use crate::publish::Publisher;
use crate::{expansion, filter, seeds, smoother};
use chrono::{Local, Timelike};
use std::collections::HashSet;

pub struct RunOutcome {
    pub title: Option<String>,
    pub tracks: Vec<Track>,
    pub mode: SeedMode,
    pub reject_summary: Vec<(&'static str, usize)>,
}

/// Runs the full generation pipeline (spec §4.2-§4.9). `dry_run` skips
/// publishing but still returns the final track list.
pub async fn run(
    client: &dyn LibraryClient,
    preset: &Preset,
    seed: Option<u64>,
    dry_run: bool,
    progress: &ProgressReporter,
) -> Result<RunOutcome, EngineError> {
    progress.stage(0, "starting");

    client
        .check_connection()
        .await
        .map_err(EngineError::Connect)?;

    let cfg = &preset.playlist;
    let mode = cfg
        .seed_mode()
        .map_err(EngineError::Config)?;

    let ctx = RunContext::new(seed);
    let period = if cfg.use_time_periods {
        Some(TimePeriod::from_hour(Local::now().hour()))
    } else {
        None
    };

    let seed_result = seeds::collect_seeds(client, &ctx, cfg, period, mode).await;
    progress.stage(20, "seeds resolved");

    let resolved_mode = match mode {
        SeedMode::Auto => expansion::resolve_auto_mode(cfg),
        other => other,
    };

    let pool = expansion::run_expansion(
        client,
        &ctx,
        &seed_result.seeds.tracks,
        &seed_result.history,
        &seed_result.excluded_keys,
        cfg,
        mode,
    )
    .await;
    progress.stage(40, "expanding candidates");

    let final_tracks = if resolved_mode == SeedMode::SonicJourney {
        finalize_journey(&ctx, pool, cfg)
    } else {
        finalize_ranked(client, &ctx, pool, &seed_result.excluded_keys, cfg, resolved_mode).await
    };
    progress.stage(60, "filtering");

    let smoothed = if resolved_mode != SeedMode::SonicJourney && cfg.sonic_smoothing {
        progress.stage(75, "smoothing");
        smoother::smooth(client, &ctx, final_tracks).await
    } else {
        final_tracks
    };

    if smoothed.is_empty() {
        return Err(EngineError::EmptyResult(
            "no tracks survived seed collection, expansion, and filtering".to_string(),
        ));
    }

    for (reason, count) in ctx.rejects.lock().unwrap().as_sorted_pairs() {
        progress.detail(&format!("rejected {count} for {reason}"));
    }

    let title = if dry_run {
        None
    } else {
        progress.stage(90, "publishing");
        let publisher = Publisher::new(client);
        let title = publisher
            .publish(cfg.custom_title.as_deref(), resolved_mode, &smoothed)
            .await?;
        Some(title)
    };

    progress.stage(100, "done");

    Ok(RunOutcome {
        title,
        tracks: smoothed,
        mode: resolved_mode,
        reject_summary: ctx.rejects.lock().unwrap().as_sorted_pairs(),
    })
}

/// Sonic Journey: truncate to `max_tracks` preserving order; never re-ranked
/// or re-filtered against the static predicate (spec §5, §9).
fn finalize_journey(
    _ctx: &RunContext,
    pool: CandidatePool,
    cfg: &crate::domain::PlaylistConfig,
) -> Vec<Track> {
    let mut seen_ids = HashSet::new();
    let mut out = Vec::new();
    for track in pool {
        if out.len() >= cfg.max_tracks {
            break;
        }
        if seen_ids.insert(track.id.clone()) {
            out.push(track);
        }
    }
    out
}

/// Static filter + fuzzy dedup + rank + cap enforcement for every mode except
/// Sonic Journey (spec §4.5).
async fn finalize_ranked(
    client: &dyn LibraryClient,
    ctx: &RunContext,
    pool: CandidatePool,
    excluded_keys: &HashSet<TrackId>,
    cfg: &crate::domain::PlaylistConfig,
    mode: SeedMode,
) -> Vec<Track> {
    let static_filter = StaticFilter::new(cfg);
    let skip_static_filter = mode == SeedMode::StrictCollection;

    let mut seen_ids: HashSet<TrackId> = HashSet::new();
    let mut seen_fingerprints: HashSet<String> = HashSet::new();
    let mut filtered = Vec::with_capacity(pool.len());

    for track in pool {
        if !skip_static_filter {
            match static_filter
                .check(client, ctx, &track, &seen_ids, excluded_keys)
                .await
            {
                FilterOutcome::Accepted => {}
                FilterOutcome::Rejected(reason) => {
                    ctx.bump_reject(reason);
                    continue;
                }
            }
        } else if seen_ids.contains(&track.id) || excluded_keys.contains(&track.id) {
            ctx.bump_reject("duplicate");
            continue;
        }

        let fp = fuzzy_fingerprint(&track.artist_name, &track.title);
        if !seen_fingerprints.insert(fp) {
            ctx.bump_reject("fuzzy_duplicate");
            continue;
        }

        seen_ids.insert(track.id.clone());
        filtered.push(track);
    }

    filter::smart_sort(
        &mut filtered,
        ctx,
        cfg.exploit_weight,
        true,
        cfg.recently_added_days,
        cfg.recently_added_weight,
    );

    filter::caps::enforce_caps(client, ctx, filtered, cfg).await
}
