use std::sync::Arc;
use std::time::Duration;

use insight_core::storage::{Storage, StorageExt, StorageKey};
use serde_json::{Value, json};
use tokio::time::timeout;

use crate::storage::JsonFileStorage;

#[tokio::test]
async fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::open(&dir.path().join("storage.json")).unwrap();

    assert_eq!(storage.get_item(StorageKey::Percent).await.unwrap(), None);
    assert!(!storage.path().exists());
}

#[tokio::test]
async fn changes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let storage = JsonFileStorage::open(&path).unwrap();
    storage.set_typed(StorageKey::Percent, &45u8).await.unwrap();
    storage
        .set_typed(StorageKey::IgnoreWord, &vec!["cat".to_string()])
        .await
        .unwrap();
    assert!(path.exists());

    let reopened = JsonFileStorage::open(&path).unwrap();
    assert_eq!(reopened.get_typed::<u8>(StorageKey::Percent).await.unwrap(), Some(45));
    assert_eq!(
        reopened.get_item(StorageKey::IgnoreWord).await.unwrap(),
        Some(json!(["cat"]))
    );
}

#[tokio::test]
async fn removing_a_key_rewrites_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let storage = JsonFileStorage::open(&path).unwrap();
    storage.set_item(StorageKey::Mode, Some(json!("disable"))).await.unwrap();
    storage.set_item(StorageKey::Mode, None).await.unwrap();

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, json!({}));
}

#[tokio::test]
async fn unknown_keys_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"local:percent": 20, "local:legacy": true}"#).unwrap();

    let storage = JsonFileStorage::open(&path).unwrap();
    assert_eq!(storage.get_item(StorageKey::Percent).await.unwrap(), Some(json!(20)));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(JsonFileStorage::open(&path).is_err());
}

#[tokio::test]
async fn watchers_see_changes_only() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonFileStorage::open(&dir.path().join("storage.json")).unwrap();
    let watch = storage.watch(StorageKey::Percent);

    storage.set_item(StorageKey::Percent, Some(json!(30))).await.unwrap();
    storage.set_item(StorageKey::Percent, Some(json!(30))).await.unwrap();
    storage.set_item(StorageKey::Percent, Some(json!(50))).await.unwrap();

    let first = timeout(Duration::from_secs(1), watch.recv()).await.unwrap().unwrap();
    assert_eq!(first.old_value, None);
    assert_eq!(first.new_value, Some(json!(30)));

    let second = timeout(Duration::from_secs(1), watch.recv()).await.unwrap().unwrap();
    assert_eq!(second.old_value, Some(json!(30)));
    assert_eq!(second.new_value, Some(json!(50)));

    assert_eq!(watch.try_recv().unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_leave_latest_state_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    for _ in 0..20 {
        let storage = Arc::new(JsonFileStorage::open(&path).unwrap());
        let tasks: Vec<_> = (0..8u8)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage.set_typed(StorageKey::Percent, &(i * 10)).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let in_memory = storage.get_item(StorageKey::Percent).await.unwrap();
        let on_disk = JsonFileStorage::open(&path)
            .unwrap()
            .get_item(StorageKey::Percent)
            .await
            .unwrap();
        assert_eq!(on_disk, in_memory);
    }
}
