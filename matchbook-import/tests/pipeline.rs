use matchbook_core::Library;
use matchbook_db::{
    add_extension, insert_game, insert_player, library_stats, load_library, open_memory,
    register_location,
};
use matchbook_export::{ExportDataset, ExportMatch, ExportPlayer, ExportResult};
use matchbook_import::{
    ExtensionMapping, GameDraft, GameMapping, ImportPipeline, LocationMapping, PipelineStep,
    PlayerMapping, ValidationError,
};

fn result(player_id: &str, score: f64) -> ExportResult {
    ExportResult {
        player_id: player_id.to_string(),
        score,
        is_winner: false,
        is_starter: false,
        score_breakdown: None,
        team_id: None,
    }
}

fn one_match(id: &str, location: Option<&str>, players: &[&str]) -> ExportMatch {
    ExportMatch {
        id: id.to_string(),
        game_id: "import-game-1".to_string(),
        date: "2024-03-01".to_string(),
        duration: None,
        location: location.map(str::to_string),
        results: players.iter().map(|p| result(p, 10.0)).collect(),
        extension_ids: vec![],
    }
}

fn dataset(title: &str, matches: Vec<ExportMatch>, players: &[(&str, &str)]) -> ExportDataset {
    ExportDataset {
        kind: "match_export".to_string(),
        version: 1,
        source_game_title: title.to_string(),
        matches,
        players: players
            .iter()
            .map(|(id, name)| ExportPlayer {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
        extensions: vec![],
    }
}

#[test]
fn empty_selection_yields_no_pipeline() {
    assert!(ImportPipeline::new(vec![], &Library::default()).is_none());
}

#[test]
fn exact_game_title_is_preselected_but_still_a_game_step() {
    let conn = open_memory().unwrap();
    insert_game(&conn, "game:azul", "Azul").unwrap();
    let library = load_library(&conn).unwrap();

    let ds = dataset("Azul", vec![one_match("m1", None, &["f1"])], &[("f1", "Alex")]);
    let pipeline = ImportPipeline::new(vec![ds], &library).unwrap();

    assert_eq!(pipeline.step(), PipelineStep::GameMapping);
    assert_eq!(
        pipeline.mappings().game,
        GameMapping::UseExisting("game:azul".to_string())
    );
}

#[test]
fn unresolved_game_blocks_the_first_step() {
    let library = Library::default();
    let ds = dataset("Obscure Game", vec![one_match("m1", None, &["f1"])], &[("f1", "Alex")]);
    let mut pipeline = ImportPipeline::new(vec![ds], &library).unwrap();

    assert_eq!(
        pipeline.advance(&library).unwrap_err(),
        ValidationError::GameUnresolved
    );
    assert_eq!(pipeline.step(), PipelineStep::GameMapping);
}

#[test]
fn dataset_without_locations_skips_the_location_step() {
    let library = Library::default();
    let ds = dataset("Azul", vec![one_match("m1", None, &["f1"])], &[("f1", "Alex")]);
    let mut pipeline = ImportPipeline::new(vec![ds], &library).unwrap();

    pipeline.set_game_mapping(
        GameMapping::CreateNew(GameDraft {
            title: "Azul".to_string(),
        }),
        &library,
    );
    assert_eq!(pipeline.advance(&library).unwrap(), PipelineStep::PlayerMapping);
}

#[test]
fn unresolved_players_block_advancement_without_store_writes() {
    let conn = open_memory().unwrap();
    let library = load_library(&conn).unwrap();

    let ds = dataset("Azul", vec![one_match("m1", None, &["f1"])], &[("f1", "Alex")]);
    let mut pipeline = ImportPipeline::new(vec![ds], &library).unwrap();
    pipeline.set_game_mapping(
        GameMapping::CreateNew(GameDraft {
            title: "Azul".to_string(),
        }),
        &library,
    );
    pipeline.advance(&library).unwrap();
    assert_eq!(pipeline.step(), PipelineStep::PlayerMapping);

    // "Alex" is unknown, so the entry pre-fills unresolved — never
    // auto-defaulted to create-new.
    assert_eq!(
        pipeline.mappings().players.get("f1"),
        Some(&PlayerMapping::Unresolved)
    );
    assert_eq!(
        pipeline.advance(&library).unwrap_err(),
        ValidationError::PlayersUnresolved(1)
    );
    assert_eq!(pipeline.step(), PipelineStep::PlayerMapping);

    // Nothing was created anywhere while guards were failing.
    let stats = library_stats(&conn).unwrap();
    assert_eq!(stats.games, 0);
    assert_eq!(stats.players, 0);
    assert_eq!(stats.matches, 0);
}

#[test]
fn location_prefills_and_custom_entries() {
    let conn = open_memory().unwrap();
    register_location(&conn, "Home Office").unwrap();
    let library = load_library(&conn).unwrap();

    let ds = dataset(
        "Azul",
        vec![
            one_match("m1", Some("home office"), &["f1"]),
            one_match("m2", Some("Attic"), &["f1"]),
        ],
        &[("f1", "Alex")],
    );
    let mut pipeline = ImportPipeline::new(vec![ds], &library).unwrap();
    pipeline.set_game_mapping(
        GameMapping::CreateNew(GameDraft {
            title: "Azul".to_string(),
        }),
        &library,
    );
    pipeline.advance(&library).unwrap();
    assert_eq!(pipeline.step(), PipelineStep::LocationMapping);
    assert_eq!(pipeline.unique_locations(), ["home office", "Attic"]);

    // Known location pre-selects it; unknown one defaults to create-new.
    assert_eq!(
        pipeline.mappings().locations.get("home office"),
        Some(&LocationMapping::UseExisting("Home Office".to_string()))
    );
    assert_eq!(
        pipeline.mappings().locations.get("Attic"),
        Some(&LocationMapping::CreateNew)
    );

    // The location step never blocks, even mid-edit.
    pipeline.set_location_mapping("Attic", LocationMapping::Custom(String::new()));
    assert_eq!(pipeline.advance(&library).unwrap(), PipelineStep::PlayerMapping);
}

#[test]
fn changing_target_game_rematches_only_unresolved_extensions() {
    let conn = open_memory().unwrap();
    insert_game(&conn, "game:catan", "Catan").unwrap();
    add_extension(&conn, "game:catan", "game:catan:seafarers", "Seafarers").unwrap();
    let library = load_library(&conn).unwrap();

    let mut ds = dataset("Catan Base", vec![one_match("m1", None, &["f1"])], &[("f1", "Alex")]);
    ds.extensions = vec![
        matchbook_export::ExportExtension {
            id: "x1".to_string(),
            title: "Seafarers".to_string(),
        },
        matchbook_export::ExportExtension {
            id: "x2".to_string(),
            title: "Homebrew Rules".to_string(),
        },
    ];

    // Title doesn't exactly match, so the game starts unresolved and no
    // extension candidates exist yet.
    let mut pipeline = ImportPipeline::new(vec![ds], &library).unwrap();
    assert_eq!(
        pipeline.mappings().extensions.get("x1"),
        Some(&ExtensionMapping::Unresolved)
    );

    // The user decides one entry, then picks the target game.
    pipeline.set_extension_mapping("x2", ExtensionMapping::Ignore);
    pipeline.set_game_mapping(GameMapping::UseExisting("game:catan".to_string()), &library);

    // The unresolved entry was auto-matched; the confirmed one kept.
    assert_eq!(
        pipeline.mappings().extensions.get("x1"),
        Some(&ExtensionMapping::UseExisting("game:catan:seafarers".to_string()))
    );
    assert_eq!(
        pipeline.mappings().extensions.get("x2"),
        Some(&ExtensionMapping::Ignore)
    );
}

#[test]
fn queue_isolation_between_datasets() {
    let conn = open_memory().unwrap();
    register_location(&conn, "Home Office").unwrap();
    insert_player(
        &conn,
        &matchbook_core::Player {
            id: "p1".to_string(),
            name: "Alex".to_string(),
            avatar: String::new(),
        },
    )
    .unwrap();
    let library = load_library(&conn).unwrap();

    let ds_a = dataset("Azul", vec![one_match("m1", Some("Home"), &["f1"])], &[("f1", "Alex")]);
    let ds_b = dataset("Cascadia", vec![one_match("m2", Some("Home"), &["f1"])], &[("f1", "Alex")]);

    let mut pipeline = ImportPipeline::new(vec![ds_a, ds_b], &library).unwrap();
    assert_eq!(pipeline.position(), (0, 2));
    assert!(!pipeline.is_last_dataset());

    // Dataset A: map "Home" to the existing "Home Office".
    pipeline.set_game_mapping(
        GameMapping::CreateNew(GameDraft {
            title: "Azul".to_string(),
        }),
        &library,
    );
    pipeline.advance(&library).unwrap();
    pipeline.set_location_mapping(
        "Home",
        LocationMapping::UseExisting("Home Office".to_string()),
    );
    pipeline.advance(&library).unwrap();
    pipeline.advance(&library).unwrap();
    assert_eq!(pipeline.step(), PipelineStep::Commit);

    let outcome = pipeline.commit(&conn, &load_library(&conn).unwrap()).unwrap();
    assert_eq!(outcome.stats.matches_imported, 1);

    // Dataset B starts from a fresh table: its identical foreign "Home"
    // must not inherit dataset A's "Home Office" decision.
    assert_eq!(pipeline.position(), (1, 2));
    assert_eq!(pipeline.step(), PipelineStep::GameMapping);
    assert!(pipeline.mappings().locations.is_empty());

    pipeline.set_game_mapping(
        GameMapping::CreateNew(GameDraft {
            title: "Cascadia".to_string(),
        }),
        &library,
    );
    pipeline.advance(&library).unwrap();
    assert_eq!(
        pipeline.mappings().locations.get("Home"),
        Some(&LocationMapping::CreateNew)
    );
}
