//! Playlist Engine CLI entry point.

use clap::Parser;
use log::LevelFilter;
use playlist_engine::cli::{handle_command, Cli};
use playlist_engine::core::logging;

#[tokio::main]
async fn main() {
    logging::init_logging(LevelFilter::Info);
    let cli = Cli::parse();

    if cli.version {
        println!("playlist-engine {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let Some(command) = cli.command else {
        println!("Generates and publishes a Library Server playlist from a preset.");
        println!();
        println!("Usage: playlist-engine [OPTIONS] <COMMAND>");
        println!();
        println!("Commands:");
        println!("  generate  Generate (and publish) a playlist from a preset");
        println!("  presets   Inspect the preset store");
        println!("  help      Print this message or the help of the given subcommand(s)");
        println!();
        println!("Options:");
        println!("  -v, --version  Show version information");
        println!("  -h, --help     Print help");
        return;
    };

    if let Err(err) = handle_command(command).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}
