use crate::gemini_harness::{API_KEY, app_with, config_for, reply, text_request};
use forensight::session::{
    HistoryItem, HistoryStorage, JsonFileHistoryStorage, LogSlice, MAX_HISTORY_ITEMS,
    ProcessCredentialStorage, SessionStore,
};
use forensight::workflows::Outcome;
use tempfile::TempDir;
use wiremock::MockServer;

fn log_item(n: usize) -> HistoryItem {
    HistoryItem::from_logs(&LogSlice {
        logs: format!("event {n}"),
        focus_term: String::new(),
        analysis: format!("report {n}"),
    })
}

fn store_at(path: &std::path::Path) -> SessionStore {
    SessionStore::init(
        Box::new(ProcessCredentialStorage::new()),
        Box::new(JsonFileHistoryStorage::new(path)),
    )
}

#[test]
fn history_survives_a_restart_newest_first_and_capped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");

    let store = store_at(&path);
    for n in 0..MAX_HISTORY_ITEMS + 5 {
        store.add_history_item(log_item(n));
    }
    let before = store.history();
    assert_eq!(before.len(), MAX_HISTORY_ITEMS);
    drop(store);

    let reloaded = store_at(&path).history();
    assert_eq!(reloaded, before);
    assert_eq!(reloaded[0].summary(80), format!("event {}", MAX_HISTORY_ITEMS + 4));
    assert_eq!(
        reloaded.last().map(|item| item.summary(80)),
        Some("event 5".to_string())
    );
}

#[test]
fn file_format_matches_the_history_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let storage = JsonFileHistoryStorage::new(&path);
    storage.save(&[log_item(1)]).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &raw[0];
    assert_eq!(entry["type"], "Log Analysis");
    assert_eq!(entry["logs"], "event 1");
    assert_eq!(entry["analysisResult"], "report 1");
    assert!(entry["id"].is_string());
    assert!(entry["timestamp"].is_string());
}

#[test]
fn corrupt_history_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = store_at(&path);
    assert!(store.history().is_empty());

    store.add_history_item(log_item(1));
    assert_eq!(store_at(&path).history().len(), 1);
}

#[test]
fn credential_is_never_written_to_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let store = store_at(&path);
    assert!(store.submit_credential(API_KEY));
    store.add_history_item(log_item(1));
    store.clear_history();
    store.add_history_item(log_item(2));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains(API_KEY));
    assert!(!dir.path().join("credential").exists());
}

#[tokio::test]
async fn completed_generation_is_persisted() {
    let server = MockServer::start().await;
    text_request("list running processes")
        .respond_with(reply("Get-Process"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let app = app_with(
        config_for(&server),
        Some(API_KEY),
        Box::new(JsonFileHistoryStorage::new(&path)),
    );
    app.script.update_prompt("list running processes");
    assert_eq!(app.script.generate().await, Outcome::Completed);

    let saved = JsonFileHistoryStorage::new(&path).load().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, app.store.history()[0].id);
}
