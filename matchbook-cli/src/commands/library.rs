//! Shelf management: games, players, and locations.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use matchbook_core::{default_avatar, extension_id, fresh_id, game_id, Player};

use super::open_library;
use crate::CliError;

pub(crate) fn run_games_list(db: Option<PathBuf>) -> Result<(), CliError> {
    let conn = open_library(db)?;
    let games = matchbook_db::list_games(&conn)
        .map_err(|e| CliError::database(format!("Failed to list games: {}", e)))?;

    if games.is_empty() {
        log::info!(
            "{}",
            "No games on the shelf yet.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!("Run 'matchbook games add <title>' to add one.");
        return Ok(());
    }

    for game in &games {
        log::info!(
            "{} {}",
            game.title.if_supports_color(Stdout, |t| t.bold()),
            format!("[{}]", game.id).if_supports_color(Stdout, |t| t.dimmed()),
        );
        for ext in &game.extensions {
            log::info!(
                "  + {} {}",
                ext.title,
                format!("[{}]", ext.id).if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}

pub(crate) fn run_games_add(
    db: Option<PathBuf>,
    title: &str,
    extensions: &[String],
) -> Result<(), CliError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CliError::other("game title cannot be empty"));
    }

    let conn = open_library(db)?;

    let existing = matchbook_db::find_game_by_title(&conn, title)
        .map_err(|e| CliError::database(format!("Failed to query games: {}", e)))?;
    if let Some(game) = existing {
        return Err(CliError::other(format!(
            "a game titled '{}' already exists [{}]",
            game.title, game.id,
        )));
    }

    let id = game_id(title);
    matchbook_db::insert_game(&conn, &id, title)
        .map_err(|e| CliError::database(format!("Failed to add game: {}", e)))?;

    for ext_title in extensions {
        let ext_title = ext_title.trim();
        if ext_title.is_empty() {
            continue;
        }
        let ext_id = extension_id(&id, ext_title);
        matchbook_db::add_extension(&conn, &id, &ext_id, ext_title)
            .map_err(|e| CliError::database(format!("Failed to add extension: {}", e)))?;
    }

    log::info!(
        "{} Added {} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        title.if_supports_color(Stdout, |t| t.bold()),
        format!("[{}]", id).if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

pub(crate) fn run_players_list(db: Option<PathBuf>) -> Result<(), CliError> {
    let conn = open_library(db)?;
    let players = matchbook_db::list_players(&conn)
        .map_err(|e| CliError::database(format!("Failed to list players: {}", e)))?;

    if players.is_empty() {
        log::info!(
            "{}",
            "No players yet.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    for player in &players {
        log::info!(
            "{} {} {}",
            format!("[{}]", player.avatar).if_supports_color(Stdout, |t| t.cyan()),
            player.name.if_supports_color(Stdout, |t| t.bold()),
            format!("({})", player.id).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

pub(crate) fn run_players_add(
    db: Option<PathBuf>,
    name: &str,
    avatar: Option<String>,
) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::other("player name cannot be empty"));
    }

    let conn = open_library(db)?;

    let player = Player {
        id: fresh_id(),
        name: name.to_string(),
        avatar: avatar.unwrap_or_else(|| default_avatar(name)),
    };
    matchbook_db::insert_player(&conn, &player)
        .map_err(|e| CliError::database(format!("Failed to add player: {}", e)))?;

    log::info!(
        "{} Added {} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        player.name.if_supports_color(Stdout, |t| t.bold()),
        format!("[{}]", player.avatar).if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn run_locations_list(db: Option<PathBuf>) -> Result<(), CliError> {
    let conn = open_library(db)?;
    let locations = matchbook_db::list_locations(&conn)
        .map_err(|e| CliError::database(format!("Failed to list locations: {}", e)))?;

    if locations.is_empty() {
        log::info!(
            "{}",
            "No locations yet.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    for location in &locations {
        log::info!("{}", location);
    }
    Ok(())
}

pub(crate) fn run_locations_add(db: Option<PathBuf>, name: &str) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::other("location name cannot be empty"));
    }

    let conn = open_library(db)?;
    matchbook_db::register_location(&conn, name)
        .map_err(|e| CliError::database(format!("Failed to add location: {}", e)))?;

    log::info!(
        "{} Registered {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        name.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}
