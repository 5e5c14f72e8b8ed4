use matchbook_export::{detect_datasets, ExportDataset};
use serde_json::json;

#[test]
fn native_payload_yields_one_preselected_dataset() {
    let value = json!({
        "type": "match_export",
        "version": 1,
        "sourceGameTitle": "Wingspan",
        "matches": [{
            "id": "m1",
            "gameId": "g1",
            "date": "2024-05-01",
            "results": [{"playerId": "p1", "score": "31", "isWinner": true}]
        }],
        "players": [{"id": "p1", "name": "Alex"}],
        "extensions": []
    });

    let detected = detect_datasets(&value);
    assert_eq!(detected.datasets.len(), 1);
    assert_eq!(detected.preselected, vec![0]);

    let ds = &detected.datasets[0];
    assert_eq!(ds.source_game_title, "Wingspan");
    // Numeric-looking string scores decode to numbers.
    assert_eq!(ds.matches[0].results[0].score, 31.0);
    assert!(ds.matches[0].results[0].is_winner);
}

#[test]
fn foreign_single_game_scenario() {
    let value = json!({
        "plays": [{
            "gameRefId": 1,
            "playerScores": [{"playerRefId": 10, "score": 42, "winner": true}],
            "playDate": "2024-03-01"
        }],
        "players": [{"id": 10, "name": "Alex"}],
        "games": [{"id": 1, "name": "Wingspan"}]
    });

    let detected = detect_datasets(&value);
    assert_eq!(detected.datasets.len(), 1);

    let ds = &detected.datasets[0];
    assert_eq!(ds.source_game_title, "Wingspan");
    assert_eq!(ds.players.len(), 1);
    assert_eq!(ds.players[0].name, "Alex");
    assert!(ds.extensions.is_empty());

    assert_eq!(ds.matches.len(), 1);
    let m = &ds.matches[0];
    assert_eq!(m.date, "2024-03-01");
    assert_eq!(m.results.len(), 1);
    assert_eq!(m.results[0].score, 42.0);
    assert!(m.results[0].is_winner);
    assert!(!m.results[0].is_starter);
}

#[test]
fn foreign_multi_game_payload_splits_per_game() {
    let value = json!({
        "plays": [
            {"gameRefId": 1, "playerScores": [{"playerRefId": 10, "score": 5}]},
            {"gameRefId": 2, "playerScores": [{"playerRefId": 11, "score": 7}]},
            {"gameRefId": 1, "playerScores": [{"playerRefId": 11, "score": 9}]}
        ],
        "players": [{"id": 10, "name": "Alex"}, {"id": 11, "name": "Bo"}],
        "games": [{"id": 1, "name": "Azul"}, {"id": 2, "name": "Cascadia"}]
    });

    let detected = detect_datasets(&value);
    assert_eq!(detected.datasets.len(), 2);
    // All foreign datasets start selected.
    assert_eq!(detected.preselected, vec![0, 1]);

    // First-seen game order is preserved.
    assert_eq!(detected.datasets[0].source_game_title, "Azul");
    assert_eq!(detected.datasets[1].source_game_title, "Cascadia");
    assert_eq!(detected.datasets[0].matches.len(), 2);
    assert_eq!(detected.datasets[1].matches.len(), 1);

    // Only players that actually appear in a dataset's plays are retained.
    let azul = &detected.datasets[0];
    assert_eq!(azul.players.len(), 2);
    let cascadia = &detected.datasets[1];
    assert_eq!(cascadia.players.len(), 1);
    assert_eq!(cascadia.players[0].name, "Bo");
}

#[test]
fn expansions_locations_and_durations_carry_through() {
    let value = json!({
        "plays": [{
            "gameRefId": 1,
            "playerScores": [{"playerRefId": 10, "score": 12, "startPlayer": true}],
            "expansionRefIds": [7, 7, 8],
            "durationMin": 95,
            "locationRefId": 3,
            "playDate": "2024-06-10"
        }],
        "players": [{"id": 10, "name": "Alex"}],
        "games": [
            {"id": 1, "name": "Catan"},
            {"id": 7, "name": "Seafarers"},
            {"id": 8, "name": "Cities & Knights"}
        ],
        "locations": [{"id": 3, "name": "Game Cafe"}]
    });

    let detected = detect_datasets(&value);
    let ds = &detected.datasets[0];

    // Expansions are deduplicated by foreign id and titled from the catalog.
    assert_eq!(ds.extensions.len(), 2);
    assert_eq!(ds.extensions[0].title, "Seafarers");
    assert_eq!(ds.extensions[1].title, "Cities & Knights");

    let m = &ds.matches[0];
    assert_eq!(m.extension_ids.len(), 3);
    assert_eq!(m.duration.as_deref(), Some("1:35"));
    assert_eq!(m.location.as_deref(), Some("Game Cafe"));
    assert!(m.results[0].is_starter);
}

#[test]
fn missing_required_arrays_degrade_to_zero_datasets() {
    let detected = detect_datasets(&json!({"plays": []}));
    assert!(detected.is_empty());

    let detected = detect_datasets(&json!({"somethingElse": true}));
    assert!(detected.is_empty());

    // Plays referencing no game also produce nothing.
    let detected = detect_datasets(&json!({
        "plays": [{"playerScores": []}],
        "players": [],
        "games": []
    }));
    assert!(detected.is_empty());
}

#[test]
fn unique_locations_deduplicate_in_first_seen_order() {
    let value = json!({
        "plays": [
            {"gameRefId": 1, "playerScores": [{"playerRefId": 1}], "locationRefId": 1},
            {"gameRefId": 1, "playerScores": [{"playerRefId": 1}], "locationRefId": 2},
            {"gameRefId": 1, "playerScores": [{"playerRefId": 1}], "locationRefId": 1}
        ],
        "players": [{"id": 1, "name": "Alex"}],
        "games": [{"id": 1, "name": "Root"}],
        "locations": [{"id": 1, "name": "Home"}, {"id": 2, "name": "Club"}]
    });

    let ds: &ExportDataset = &detect_datasets(&value).datasets[0];
    assert_eq!(ds.unique_locations(), vec!["Home".to_string(), "Club".to_string()]);
}
