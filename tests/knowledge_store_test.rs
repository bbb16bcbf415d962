use std::sync::Arc;

use mender::adapters::JsonKnowledgeStore;
use mender::domain::models::{Action, QTable};
use mender::domain::ports::KnowledgeStore;
use mender::{DomainError, Knowledge};

fn populated_table() -> QTable {
    let mut table = QTable::new();
    for error_code in [4, 401, 27] {
        for context_id in 1..=2 {
            for action_id in 1..=3 {
                let mut action = Action::new(
                    action_id,
                    context_id,
                    action_id % 2,
                    format!("repair {error_code}/{context_id}/{action_id}"),
                );
                action.weight = f64::from(error_code * 10 + context_id - action_id);
                action.tags.set_value(0, i64::from(action_id) * 500);
                action.tags.set_value(4, -100);
                table.insert_action(error_code, context_id, action);
            }
        }
    }
    table
}

#[tokio::test]
async fn test_round_trip_preserves_every_triple() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = JsonKnowledgeStore::new(dir.path().join("knowledge.json"));

    let table = populated_table();
    store.save(&table).await.expect("failed to save knowledge");

    let reloaded = store
        .load()
        .await
        .expect("failed to load knowledge")
        .expect("document should exist");

    assert_eq!(reloaded, table);

    // Spot-check one triple's full contents.
    let action = reloaded.action(401, 2, 3).expect("triple should exist");
    assert_eq!(action.message, "repair 401/2/3");
    assert_eq!(action.sub_hierarchy, 1);
    assert_eq!(action.tags.value(0), Some(1500));
    assert_eq!(action.tags.value(4), Some(-100));
}

#[tokio::test]
async fn test_missing_document_loads_as_none() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = JsonKnowledgeStore::new(dir.path().join("does-not-exist.json"));

    let loaded = store.load().await.expect("missing file is not an error");
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_malformed_document_is_corruption() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("knowledge.json");
    std::fs::write(&path, "{\"version\": 1, \"errors\": \"not-a-list\"}").unwrap();

    let store = JsonKnowledgeStore::new(&path);
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, DomainError::Corrupt(_)));
}

#[tokio::test]
async fn test_action_without_id_aborts_load() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("knowledge.json");
    std::fs::write(
        &path,
        r#"{
            "version": 1,
            "saved_at": "2025-01-01T00:00:00Z",
            "errors": [{
                "code": 401,
                "contexts": [{
                    "id": 1,
                    "actions": [
                        {"id": 1, "weight": 5.0, "message": "ok", "hierarchy": 1, "sub_hierarchy": 0},
                        {"weight": 7.0, "message": "no id", "hierarchy": 1, "sub_hierarchy": 0}
                    ]
                }]
            }]
        }"#,
    )
    .unwrap();

    let store = JsonKnowledgeStore::new(&path);
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, DomainError::Corrupt(_)));
}

#[tokio::test]
async fn test_save_overwrites_previous_document() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = JsonKnowledgeStore::new(dir.path().join("knowledge.json"));

    store.save(&populated_table()).await.unwrap();

    let mut smaller = QTable::new();
    smaller.insert_action(1, 1, Action::new(1, 1, 0, "only one"));
    store.save(&smaller).await.unwrap();

    let reloaded = store.load().await.unwrap().unwrap();
    assert_eq!(reloaded, smaller);
    assert_eq!(reloaded.error_count(), 1);
}

#[tokio::test]
async fn test_knowledge_service_load_replaces_in_memory_table() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("knowledge.json");
    let store = Arc::new(JsonKnowledgeStore::new(&path));

    store.save(&populated_table()).await.unwrap();

    let mut knowledge = Knowledge::new(store, Some(1));
    let found = knowledge.load().await.expect("load should succeed");
    assert!(found);
    assert_eq!(knowledge.qtable().error_count(), 3);
    assert_eq!(knowledge.optimal_action(401).unwrap().id, 1);
}
