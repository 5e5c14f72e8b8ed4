//! matchbook CLI
//!
//! Command-line interface for the matchbook play library: record games,
//! players, and locations, and move match history between libraries via
//! share payloads.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;

pub(crate) use error::CliError;

#[derive(Parser)]
#[command(name = "matchbook")]
#[command(about = "Track board game matches and import shared play history", long_about = None)]
struct Cli {
    /// Path to the library database (default: platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import matches from a share URL, payload text, or payload file
    Import {
        /// Share URL, raw payload, or a path to a file containing one
        source: String,

        /// Dataset indices to import (e.g., 0,2); default: all detected
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<usize>>,

        /// Create games, players, and locations with no local match
        #[arg(long)]
        create_missing: bool,

        /// Show what would be imported without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Export one game's matches as a payload or share URL
    Export {
        /// Game title or id to export
        game: String,

        /// Emit a share URL on this base address instead of raw JSON
        #[arg(long)]
        base_url: Option<String>,

        /// Write the payload to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the game shelf
    Games {
        #[command(subcommand)]
        action: GamesAction,
    },

    /// Manage players
    Players {
        #[command(subcommand)]
        action: PlayersAction,
    },

    /// Manage known locations
    Locations {
        #[command(subcommand)]
        action: LocationsAction,
    },

    /// Show library statistics
    Stats,

    /// Show the import history
    Log,
}

#[derive(Subcommand)]
enum GamesAction {
    /// List games and their extensions
    List,

    /// Add a game to the shelf
    Add {
        /// Game title
        title: String,

        /// Extension titles to register with the game
        #[arg(long = "extension", value_delimiter = ',')]
        extensions: Vec<String>,
    },
}

#[derive(Subcommand)]
enum PlayersAction {
    /// List players
    List,

    /// Add a player
    Add {
        /// Player name
        name: String,

        /// Avatar text (default: initials derived from the name)
        #[arg(long)]
        avatar: Option<String>,
    },
}

#[derive(Subcommand)]
enum LocationsAction {
    /// List known locations
    List,

    /// Register a location
    Add {
        /// Location name
        name: String,
    },
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            source,
            select,
            create_missing,
            dry_run,
        } => commands::import::run_import(cli.db, &source, select, create_missing, dry_run),
        Commands::Export {
            game,
            base_url,
            output,
        } => commands::export::run_export(cli.db, &game, base_url, output),
        Commands::Games { action } => match action {
            GamesAction::List => commands::library::run_games_list(cli.db),
            GamesAction::Add { title, extensions } => {
                commands::library::run_games_add(cli.db, &title, &extensions)
            }
        },
        Commands::Players { action } => match action {
            PlayersAction::List => commands::library::run_players_list(cli.db),
            PlayersAction::Add { name, avatar } => {
                commands::library::run_players_add(cli.db, &name, avatar)
            }
        },
        Commands::Locations { action } => match action {
            LocationsAction::List => commands::library::run_locations_list(cli.db),
            LocationsAction::Add { name } => commands::library::run_locations_add(cli.db, &name),
        },
        Commands::Stats => commands::stats::run_stats(cli.db),
        Commands::Log => commands::log::run_log(cli.db),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Info-level records go to stdout as plain text; everything else is
/// prefixed with its level on stderr.
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            if record.level() == log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(buf, "{}: {}", record.level().as_str().to_lowercase(), record.args())
            }
        })
        .init();
}

/// Emit a blank line through the logger so spacing respects filtering.
pub(crate) fn log_blank() {
    log::info!("");
}
