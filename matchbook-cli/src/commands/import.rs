//! Import shared match history into the local library.
//!
//! The CLI is non-interactive: anything the matcher could not resolve
//! either fails the import with a list of what needs attention, or gets
//! created on the fly under `--create-missing`.

use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use matchbook_core::Library;
use matchbook_db::Connection;
use matchbook_export::{decode_payload, detect_datasets, ExportDataset};
use matchbook_import::{
    log_import, CommitStats, ExtensionDraft, ExtensionMapping, GameDraft, GameMapping,
    ImportPipeline, PipelineStep, PlayerMapping,
};

use super::open_library;
use crate::CliError;

pub(crate) fn run_import(
    db: Option<PathBuf>,
    source: &str,
    select: Option<Vec<usize>>,
    create_missing: bool,
    dry_run: bool,
) -> Result<(), CliError> {
    let text = load_source(source)?;
    let value = decode_payload(&text).map_err(|e| CliError::decode(e.to_string()))?;
    let detected = detect_datasets(&value);
    if detected.is_empty() {
        return Err(CliError::import("no importable matches found in the payload"));
    }

    log::info!("Detected {} dataset(s):", detected.datasets.len());
    for (i, dataset) in detected.datasets.iter().enumerate() {
        log::info!(
            "  [{}] {} ({} matches)",
            i,
            dataset.source_game_title.if_supports_color(Stdout, |t| t.bold()),
            dataset.matches.len(),
        );
    }
    crate::log_blank();

    let indices = match select {
        Some(indices) => {
            for &i in &indices {
                if i >= detected.datasets.len() {
                    return Err(CliError::import(format!(
                        "dataset index {} out of range (0..{})",
                        i,
                        detected.datasets.len(),
                    )));
                }
            }
            indices
        }
        None => detected.preselected.clone(),
    };
    if indices.is_empty() {
        return Err(CliError::import("no datasets selected"));
    }

    if dry_run {
        log::info!(
            "{}",
            "Dry run: nothing will be written".if_supports_color(Stdout, |t| t.dimmed()),
        );
        crate::log_blank();
    }

    let conn = open_library(db)?;
    let mut totals = CommitStats::default();

    // One single-dataset pipeline per selection. Each dataset is matched
    // against a fresh library snapshot so earlier commits are visible to
    // later datasets but their mapping choices are not.
    for &i in &indices {
        let dataset = detected.datasets[i].clone();
        let library = matchbook_db::load_library(&conn)
            .map_err(|e| CliError::database(format!("Failed to load the library: {}", e)))?;
        import_dataset(&conn, &library, dataset, create_missing, dry_run, &mut totals)?;
        crate::log_blank();
    }

    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    if dry_run {
        log::info!(
            "  {} matches would be imported across {} dataset(s)",
            totals.matches_imported,
            indices.len(),
        );
        return Ok(());
    }
    log::info!(
        "  {} {} matches imported",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        totals.matches_imported,
    );
    if totals.games_created > 0 {
        log::info!("  {} games created", totals.games_created);
    }
    if totals.extensions_created > 0 {
        log::info!("  {} extensions created", totals.extensions_created);
    }
    if totals.players_created > 0 {
        log::info!("  {} players created", totals.players_created);
    }
    if totals.locations_registered > 0 {
        log::info!("  {} locations registered", totals.locations_registered);
    }
    if totals.results_skipped > 0 {
        log::warn!(
            "  {} {} result(s) skipped (unmapped players)",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            totals.results_skipped,
        );
    }
    Ok(())
}

fn import_dataset(
    conn: &Connection,
    library: &Library,
    dataset: ExportDataset,
    create_missing: bool,
    dry_run: bool,
    totals: &mut CommitStats,
) -> Result<(), CliError> {
    let title = dataset.source_game_title.clone();
    let match_count = dataset.matches.len();
    let extensions = dataset.extensions.clone();
    let players = dataset.players.clone();

    let mut pipeline = ImportPipeline::new(vec![dataset], library)
        .ok_or_else(|| CliError::import("no datasets selected"))?;

    log::info!(
        "{} ({} matches)",
        title.if_supports_color(Stdout, |t| t.bold()),
        match_count,
    );

    // Game step: take the automatch, or create the game.
    let game_mapping = pipeline.mappings().game.clone();
    match game_mapping {
        GameMapping::UseExisting(ref id) => {
            let target = library
                .game(id)
                .map(|g| g.title.clone())
                .unwrap_or_else(|| id.clone());
            log::info!(
                "  Game: {} {}",
                target.if_supports_color(Stdout, |t| t.cyan()),
                "(existing)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        _ => {
            if !create_missing {
                return Err(CliError::import(format!(
                    "no local game matches '{}'; pass --create-missing to create it",
                    title,
                )));
            }
            pipeline.set_game_mapping(
                GameMapping::CreateNew(GameDraft {
                    title: title.clone(),
                }),
                library,
            );
            log::info!(
                "  Game: {} {}",
                title.if_supports_color(Stdout, |t| t.cyan()),
                "(new)".if_supports_color(Stdout, |t| t.green()),
            );
        }
    }

    // Extension decisions that the matcher left open.
    let open_extensions: Vec<String> = pipeline
        .mappings()
        .extensions
        .iter()
        .filter(|(_, m)| matches!(m, ExtensionMapping::Unresolved))
        .map(|(id, _)| id.clone())
        .collect();
    if !open_extensions.is_empty() && !create_missing {
        let names: Vec<&str> = open_extensions
            .iter()
            .map(|id| extension_title(&extensions, id))
            .collect();
        return Err(CliError::import(format!(
            "unmatched extension(s): {}; pass --create-missing to create them",
            names.join(", "),
        )));
    }
    for foreign_id in open_extensions {
        let ext_title = extension_title(&extensions, &foreign_id).to_string();
        log::info!(
            "  Extension: {} {}",
            ext_title.if_supports_color(Stdout, |t| t.cyan()),
            "(new)".if_supports_color(Stdout, |t| t.green()),
        );
        pipeline.set_extension_mapping(
            &foreign_id,
            ExtensionMapping::Customized(ExtensionDraft { title: ext_title }),
        );
    }

    let step = pipeline
        .advance(library)
        .map_err(|e| CliError::import(e.to_string()))?;

    // The location step always passes: every location pre-fills with a
    // valid default.
    if step == PipelineStep::LocationMapping {
        pipeline
            .advance(library)
            .map_err(|e| CliError::import(e.to_string()))?;
    }

    // Player decisions: keep automatches, create the rest.
    let open_players: Vec<String> = pipeline
        .mappings()
        .players
        .iter()
        .filter(|(_, m)| matches!(m, PlayerMapping::Unresolved))
        .map(|(id, _)| id.clone())
        .collect();
    if !open_players.is_empty() && !create_missing {
        let names: Vec<&str> = open_players
            .iter()
            .map(|id| player_name(&players, id))
            .collect();
        return Err(CliError::import(format!(
            "unmatched player(s): {}; pass --create-missing to create them",
            names.join(", "),
        )));
    }
    for foreign_id in open_players {
        log::info!(
            "  Player: {} {}",
            player_name(&players, &foreign_id).if_supports_color(Stdout, |t| t.cyan()),
            "(new)".if_supports_color(Stdout, |t| t.green()),
        );
        pipeline.set_player_mapping(&foreign_id, PlayerMapping::CreateNew);
    }

    pipeline
        .advance(library)
        .map_err(|e| CliError::import(e.to_string()))?;

    if dry_run {
        totals.matches_imported += match_count as u64;
        log::info!(
            "  {} matches ready to import",
            match_count,
        );
        return Ok(());
    }

    let outcome = pipeline
        .commit(conn, library)
        .map_err(|e| CliError::import(e.to_string()))?;
    log_import(conn, &title, &outcome.stats).map_err(|e| CliError::database(e.to_string()))?;

    log::info!(
        "  {} {} matches imported into {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        outcome.stats.matches_imported,
        outcome.game_id.if_supports_color(Stdout, |t| t.dimmed()),
    );

    totals.games_created += outcome.stats.games_created;
    totals.extensions_created += outcome.stats.extensions_created;
    totals.players_created += outcome.stats.players_created;
    totals.locations_registered += outcome.stats.locations_registered;
    totals.matches_imported += outcome.stats.matches_imported;
    totals.results_skipped += outcome.stats.results_skipped;
    totals.extension_refs_dropped += outcome.stats.extension_refs_dropped;
    Ok(())
}

/// Treat the argument as a file path when one exists, else as the payload.
fn load_source(source: &str) -> Result<String, CliError> {
    let path = Path::new(source);
    if path.is_file() {
        return Ok(std::fs::read_to_string(path)?);
    }
    Ok(source.to_string())
}

fn extension_title<'a>(extensions: &'a [matchbook_export::ExportExtension], id: &'a str) -> &'a str {
    extensions
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.title.as_str())
        .unwrap_or(id)
}

fn player_name<'a>(players: &'a [matchbook_export::ExportPlayer], id: &'a str) -> &'a str {
    players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
        .unwrap_or(id)
}
