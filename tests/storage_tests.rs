//! Record store backend tests
//!
//! The same contract exercised against the JSON file backend and SQLite.

use std::sync::Arc;

use tempfile::TempDir;

use biolink::errors::BiolinkError;
use biolink::storage::{
    AccentColor, FileStorage, Icon, LinkEntry, MemoryStorage, ProfileMeta, RecordStore,
    SeaOrmStorage,
};

// =============================================================================
// Test Setup
// =============================================================================

fn link(id: &str, title: &str, sort_index: u32) -> LinkEntry {
    LinkEntry {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://example.com/{}", title),
        icon: Icon::parse("telegram"),
        accent_color: AccentColor::Blue,
        sort_index,
    }
}

async fn sqlite_store(dir: &TempDir) -> SeaOrmStorage {
    let db_path = dir.path().join("biolink_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage")
}

/// Shared contract for every backend.
async fn exercise_contract(store: &dyn RecordStore) {
    assert!(store.find_profile("alice").await.unwrap().is_none());

    let mut meta = ProfileMeta::new("Alice");
    store.insert_profile(&meta).await.unwrap();
    assert!(matches!(
        store.insert_profile(&meta).await,
        Err(BiolinkError::Conflict(_))
    ));

    meta.tagline = "hello".to_string();
    meta.share_count = 1;
    store.update_profile(&meta).await.unwrap();
    let found = store.find_profile("ALICE").await.unwrap().unwrap();
    assert_eq!(found.handle, "alice");
    assert_eq!(found.tagline, "hello");
    assert_eq!(found.share_count, 1);

    assert!(matches!(
        store.update_profile(&ProfileMeta::new("nobody")).await,
        Err(BiolinkError::NotFound(_))
    ));

    // 插入顺序与 sort_index 不一致，list_links 仍按 sort_index 返回
    store.insert_link("alice", &link("l2", "second", 1)).await.unwrap();
    store.insert_link("alice", &link("l1", "first", 0)).await.unwrap();
    store.insert_link("alice", &link("l3", "third", 2)).await.unwrap();

    let links = store.list_links("alice").await.unwrap();
    let ids: Vec<_> = links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["l1", "l2", "l3"]);
    assert_eq!(links[0], link("l1", "first", 0));

    let mut moved = link("l3", "third", 0);
    moved.accent_color = AccentColor::Red;
    store.update_link("alice", &moved).await.unwrap();
    store.update_link("alice", &link("l1", "first", 2)).await.unwrap();
    let ids: Vec<_> = store
        .list_links("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec!["l3", "l2", "l1"]);

    assert!(matches!(
        store.update_link("alice", &link("ghost", "x", 0)).await,
        Err(BiolinkError::NotFound(_))
    ));

    store.delete_link("alice", "l2").await.unwrap();
    store.delete_link("alice", "ghost").await.unwrap();
    assert_eq!(store.list_links("alice").await.unwrap().len(), 2);

    store
        .replace_links("alice", &[link("n1", "new", 0)])
        .await
        .unwrap();
    let links = store.list_links("alice").await.unwrap();
    assert_eq!(links, vec![link("n1", "new", 0)]);

    assert_eq!(store.count_profiles().await.unwrap(), 1);
}

// =============================================================================
// Backends
// =============================================================================

#[tokio::test]
async fn test_memory_storage_contract() {
    let store = MemoryStorage::new();
    exercise_contract(&store).await;
    assert_eq!(store.backend_name(), "memory");
}

#[tokio::test]
async fn test_file_storage_contract() {
    let dir = TempDir::new().unwrap();
    let store = FileStorage::open(dir.path().join("store.json")).unwrap();
    exercise_contract(&store).await;
    assert_eq!(store.backend_name(), "file");
}

#[tokio::test]
async fn test_file_storage_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.json");

    {
        let store = FileStorage::open(&path).unwrap();
        assert!(path.exists());
        store.insert_profile(&ProfileMeta::new("bob")).await.unwrap();
        store.insert_link("bob", &link("b1", "one", 0)).await.unwrap();
    }

    let reopened = FileStorage::open(&path).unwrap();
    let meta = reopened.find_profile("bob").await.unwrap().unwrap();
    assert_eq!(meta, ProfileMeta::new("bob"));
    assert_eq!(
        reopened.list_links("bob").await.unwrap(),
        vec![link("b1", "one", 0)]
    );
}

#[tokio::test]
async fn test_file_storage_failed_write_leaves_cache_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let store = FileStorage::open(&path).unwrap();
    store.insert_profile(&ProfileMeta::new("alice")).await.unwrap();
    store.insert_link("alice", &link("a1", "one", 0)).await.unwrap();

    // 文件位置变成目录，后续写入必然失败
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    assert!(matches!(
        store.insert_profile(&ProfileMeta::new("bob")).await,
        Err(BiolinkError::BackendUnavailable(_))
    ));
    assert!(store.find_profile("bob").await.unwrap().is_none());

    assert!(
        store
            .insert_link("alice", &link("a2", "two", 1))
            .await
            .is_err()
    );
    assert_eq!(
        store.list_links("alice").await.unwrap(),
        vec![link("a1", "one", 0)]
    );
}

#[tokio::test]
async fn test_file_storage_rejects_corrupt_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        FileStorage::open(&path),
        Err(BiolinkError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_sqlite_storage_contract() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir).await;
    exercise_contract(&store).await;
    assert_eq!(store.backend_name(), "sqlite");
}

#[tokio::test]
async fn test_sqlite_storage_persists_across_reconnect() {
    let dir = TempDir::new().unwrap();
    {
        let store = sqlite_store(&dir).await;
        store.insert_profile(&ProfileMeta::new("carol")).await.unwrap();
        store.insert_link("carol", &link("c1", "one", 0)).await.unwrap();
    }

    let store: Arc<dyn RecordStore> = Arc::new(sqlite_store(&dir).await);
    assert!(store.find_profile("carol").await.unwrap().is_some());
    assert_eq!(store.list_links("carol").await.unwrap().len(), 1);
}
