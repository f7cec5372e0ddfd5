//! CLI command definitions and handlers (spec §6 External Interfaces).

use crate::client::ReqwestLibraryClient;
use crate::core::errors::EngineError;
use crate::core::logging::ProgressReporter;
use crate::pipeline;
use crate::preset_loader::{self, PresetSource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playlist-engine")]
#[command(about = "Generates and publishes a Library Server playlist from a preset.")]
#[command(
    long_about = "Reads a playlist preset (engine shape or UI shape), resolves seeds, expands candidates along the chosen strategy, filters and ranks them, and publishes the result as a named playlist with a generated cover."
)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Show version information.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate (and publish, unless --dry-run) a playlist from a preset.
    Generate {
        /// Path to a preset JSON file. Reads stdin if neither this nor
        /// --preset-name is given.
        #[arg(long)]
        preset_file: Option<PathBuf>,
        /// Name of a preset in the preset store (PLAYLIST_ENGINE_PRESET_DIR
        /// or `Playlist_Presets`).
        #[arg(long)]
        preset_name: Option<String>,
        /// Emit the run outcome as JSON instead of plain progress lines.
        #[arg(long)]
        json: bool,
        /// Run the full pipeline but skip publishing.
        #[arg(long)]
        dry_run: bool,
        /// Fix the RNG seed for reproducible runs (testable property #11).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Inspect the preset store.
    Presets {
        #[command(subcommand)]
        action: PresetsAction,
    },
}

#[derive(Subcommand)]
pub enum PresetsAction {
    /// List preset names found in the preset store.
    List,
    /// Print a preset's normalized (engine-shape) contents.
    Show {
        name: String,
    },
}

pub async fn handle_command(command: Commands) -> Result<(), EngineError> {
    match command {
        Commands::Generate {
            preset_file,
            preset_name,
            json,
            dry_run,
            seed,
        } => handle_generate(preset_file, preset_name, json, dry_run, seed).await,
        Commands::Presets { action } => handle_presets(action),
    }
}

async fn handle_generate(
    preset_file: Option<PathBuf>,
    preset_name: Option<String>,
    json: bool,
    dry_run: bool,
    seed: Option<u64>,
) -> Result<(), EngineError> {
    let source = match (preset_file, preset_name) {
        (Some(path), _) => PresetSource::File(path),
        (None, Some(name)) => PresetSource::Name(name),
        (None, None) => PresetSource::Stdin,
    };
    let preset = preset_loader::load_preset(source)?;

    if preset.plex.url.is_empty() || preset.plex.token.is_empty() {
        return Err(EngineError::Config(
            "missing plex.url/plex.token (set them in the preset or via PLEX_URL/PLEX_BASEURL/PLEX_TOKEN)"
                .to_string(),
        ));
    }

    let client = ReqwestLibraryClient::new(
        preset.plex.url.clone(),
        preset.plex.token.clone(),
        preset.plex.music_library.clone(),
    );
    let progress = ProgressReporter::new(json);
    let outcome = pipeline::run(&client, &preset, seed, dry_run, &progress).await?;

    if json {
        let payload = serde_json::json!({
            "title": outcome.title,
            "mode": outcome.mode.as_str(),
            "track_count": outcome.tracks.len(),
            "track_ids": outcome.tracks.iter().map(|t| t.id.0.clone()).collect::<Vec<_>>(),
            "rejects": outcome.reject_summary,
        });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap());
    } else if let Some(title) = &outcome.title {
        println!("Published '{title}' with {} tracks.", outcome.tracks.len());
    } else {
        println!("Dry run: {} tracks selected.", outcome.tracks.len());
    }

    Ok(())
}

fn handle_presets(action: PresetsAction) -> Result<(), EngineError> {
    match action {
        PresetsAction::List => {
            let names = preset_loader::list_preset_names().map_err(EngineError::from)?;
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
        PresetsAction::Show { name } => {
            let preset = preset_loader::load_preset(PresetSource::Name(name))?;
            println!("{}", serde_json::to_string_pretty(&preset).unwrap());
            Ok(())
        }
    }
}
