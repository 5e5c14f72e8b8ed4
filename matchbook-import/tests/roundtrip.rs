//! End-to-end: encode a library's matches as a share URL, decode it on a
//! second library, walk the pipeline, and verify the committed records.

use matchbook_core::{Extension, Game, PlayedMatch, PlayedResult, Player};
use matchbook_db::{
    add_extension, insert_game, insert_player, list_locations, load_library, matches_for_game,
    open_memory,
};
use matchbook_export::{build_export, decode_payload, detect_datasets, share_url};
use matchbook_import::{ImportPipeline, PipelineStep, PlayerMapping};

fn source_game() -> Game {
    Game {
        id: "game:wingspan".to_string(),
        title: "Wingspan".to_string(),
        extensions: vec![Extension {
            id: "game:wingspan:european-expansion".to_string(),
            title: "European Expansion".to_string(),
        }],
    }
}

fn source_matches() -> Vec<PlayedMatch> {
    vec![
        PlayedMatch {
            id: "m1".to_string(),
            game_id: "game:wingspan".to_string(),
            date: "2024-05-12".to_string(),
            duration: Some("1:10".to_string()),
            location: Some("Kitchen Table".to_string()),
            results: vec![
                PlayedResult {
                    player_id: "p-alex".to_string(),
                    score: 81.0,
                    is_winner: true,
                    is_starter: false,
                    score_breakdown: None,
                    team_id: None,
                },
                PlayedResult {
                    player_id: "p-bea".to_string(),
                    score: 74.0,
                    is_winner: false,
                    is_starter: true,
                    score_breakdown: None,
                    team_id: None,
                },
            ],
            extension_ids: vec!["game:wingspan:european-expansion".to_string()],
        },
        PlayedMatch {
            id: "m2".to_string(),
            game_id: "game:wingspan".to_string(),
            date: "2024-05-19".to_string(),
            duration: None,
            location: None,
            results: vec![PlayedResult {
                player_id: "p-alex".to_string(),
                score: 90.0,
                is_winner: true,
                is_starter: true,
                score_breakdown: None,
                team_id: None,
            }],
            extension_ids: vec![],
        },
    ]
}

fn source_players() -> Vec<Player> {
    vec![
        Player {
            id: "p-alex".to_string(),
            name: "Alex".to_string(),
            avatar: "A".to_string(),
        },
        Player {
            id: "p-bea".to_string(),
            name: "Bea".to_string(),
            avatar: "B".to_string(),
        },
    ]
}

#[test]
fn share_url_roundtrips_into_a_second_library() {
    // Sender side: render the share URL from library records.
    let dataset = build_export(&source_game(), &source_matches(), &source_players());
    let url = share_url("https://matchbook.app/import", &dataset).unwrap();

    // Receiver side: a library that already knows the game and one player.
    let conn = open_memory().unwrap();
    insert_game(&conn, "game:wingspan", "Wingspan").unwrap();
    add_extension(
        &conn,
        "game:wingspan",
        "game:wingspan:european-expansion",
        "European Expansion",
    )
    .unwrap();
    insert_player(
        &conn,
        &Player {
            id: "local-alex".to_string(),
            name: "Alex".to_string(),
            avatar: "A".to_string(),
        },
    )
    .unwrap();
    let library = load_library(&conn).unwrap();

    let value = decode_payload(&url).unwrap();
    let detected = detect_datasets(&value);
    assert_eq!(detected.datasets.len(), 1);
    assert_eq!(detected.preselected, vec![0]);

    let mut pipeline = ImportPipeline::new(detected.datasets, &library).unwrap();

    // Exact title match resolves the game and its extension automatically.
    assert_eq!(pipeline.step(), PipelineStep::GameMapping);
    assert_eq!(pipeline.mappings().unresolved_extensions(), 0);
    assert_eq!(pipeline.advance(&library).unwrap(), PipelineStep::LocationMapping);

    // The unknown location pre-fills as create-new; nothing to change.
    assert_eq!(pipeline.unique_locations(), ["Kitchen Table"]);
    assert_eq!(pipeline.advance(&library).unwrap(), PipelineStep::PlayerMapping);

    // Alex matched by name; Bea is new here.
    assert_eq!(
        pipeline.mappings().players.get("p-alex"),
        Some(&PlayerMapping::UseExisting("local-alex".to_string()))
    );
    assert_eq!(pipeline.mappings().unresolved_players(), 1);
    pipeline.set_player_mapping("p-bea", PlayerMapping::CreateNew);
    assert_eq!(pipeline.advance(&library).unwrap(), PipelineStep::Commit);

    let outcome = pipeline.commit(&conn, &library).unwrap();
    assert_eq!(pipeline.step(), PipelineStep::Done);
    assert_eq!(outcome.game_id, "game:wingspan");
    assert_eq!(outcome.stats.games_created, 0);
    assert_eq!(outcome.stats.extensions_created, 0);
    assert_eq!(outcome.stats.players_created, 1);
    assert_eq!(outcome.stats.matches_imported, 2);
    assert_eq!(outcome.stats.results_skipped, 0);

    assert_eq!(list_locations(&conn).unwrap(), vec!["Kitchen Table".to_string()]);

    let mut matches = matches_for_game(&conn, "game:wingspan").unwrap();
    matches.sort_by(|a, b| a.date.cmp(&b.date));
    assert_eq!(matches.len(), 2);

    // Ids are minted locally, never carried over from the sender.
    assert_ne!(matches[0].id, "m1");
    assert_eq!(matches[0].date, "2024-05-12");
    assert_eq!(matches[0].duration.as_deref(), Some("1:10"));
    assert_eq!(matches[0].location.as_deref(), Some("Kitchen Table"));
    assert_eq!(
        matches[0].extension_ids,
        vec!["game:wingspan:european-expansion".to_string()]
    );
    assert_eq!(matches[0].results.len(), 2);

    let alex = matches[0]
        .results
        .iter()
        .find(|r| r.player_id == "local-alex")
        .unwrap();
    assert_eq!(alex.score, 81.0);
    assert!(alex.is_winner);
    assert!(!alex.is_starter);

    let bea = matches[0]
        .results
        .iter()
        .find(|r| r.player_id != "local-alex")
        .unwrap();
    assert_eq!(bea.score, 74.0);
    assert!(bea.is_starter);

    // Both matches resolve Bea to the same newly created player.
    let bea_in_second = matches[1].results.iter().all(|r| r.player_id == "local-alex");
    assert!(bea_in_second, "second match has only Alex's result");
}
