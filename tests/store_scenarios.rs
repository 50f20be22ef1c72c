use std::sync::Arc;

use cyberlearn_content::catalog::default_catalog;
use cyberlearn_content::mirror::Mirror;
use cyberlearn_content::progress::ProgressLedger;
use cyberlearn_content::remote::{MemoryRemoteCatalog, OfflineCatalog, RemoteRecord};
use cyberlearn_content::store::ContentStore;
use cyberlearn_content::types::{ContentItem, ContentType, Lesson, Module, Role, SyncStatus};

fn new_item(id: &str, kind: ContentType, title: &str) -> ContentItem {
    ContentItem::new(id.to_string(), kind, title.to_string())
}

#[tokio::test]
async fn new_course_creation_grows_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ContentStore::new(Mirror::at_dir(dir.path()), Arc::new(OfflineCatalog));
    store.load().await;
    assert_eq!(store.items().len(), 11);

    store
        .upsert(Role::Admin, new_item("course_x", ContentType::Course, "X"))
        .await
        .unwrap();

    assert_eq!(store.items().len(), 12);
    let courses: Vec<&str> = store
        .items_of_type(ContentType::Course)
        .map(|i| i.id.as_str())
        .collect();
    assert!(courses.contains(&"course_x"));
}

#[tokio::test]
async fn deleted_seed_item_returns_on_cold_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ContentStore::new(Mirror::at_dir(dir.path()), Arc::new(OfflineCatalog));
    store.load().await;

    store
        .delete(Role::Admin, "note_crypto_cheat_sheet")
        .await
        .unwrap();
    assert!(store.find_by_id("note_crypto_cheat_sheet").is_none());

    // remount with empty remote and empty mirror: the seed is back
    let cold_dir = tempfile::tempdir().unwrap();
    let mut remounted =
        ContentStore::new(Mirror::at_dir(cold_dir.path()), Arc::new(OfflineCatalog));
    remounted.load().await;
    assert!(remounted.find_by_id("note_crypto_cheat_sheet").is_some());
}

#[tokio::test]
async fn warm_mirror_cannot_suppress_seed_items_either() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = ContentStore::new(Mirror::at_dir(dir.path()), Arc::new(OfflineCatalog));
        store.load().await;
        store
            .delete(Role::Admin, "note_crypto_cheat_sheet")
            .await
            .unwrap();
    }

    // the mirror remembers the delete, but the merge policy re-fills seed
    // gaps on load, so the item comes back; see the seed non-deletability
    // note in DESIGN.md
    let mut remounted = ContentStore::new(Mirror::at_dir(dir.path()), Arc::new(OfflineCatalog));
    remounted.load().await;
    assert!(remounted.find_by_id("note_crypto_cheat_sheet").is_some());
}

#[tokio::test]
async fn lesson_completion_aggregates_one_of_four() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ContentStore::new(Mirror::at_dir(dir.path()), Arc::new(OfflineCatalog));
    store.load().await;

    let mut item = new_item("course_agg", ContentType::Course, "Aggregation");
    for m in 0..2 {
        let mut module = Module::new(format!("mod_agg_{m}"), format!("Module {m}"));
        for l in 0..2 {
            module.lessons.push(Lesson::new(
                format!("les_agg_{m}{l}"),
                format!("Lesson {m}{l}"),
            ));
        }
        item.modules.push(module);
    }
    let item = store.upsert(Role::Admin, item).await.unwrap();

    let mut ledger = ProgressLedger::open(dir.path());
    ledger.mark_complete("les_agg_00");

    let stored = store.find_by_id(&item.id).unwrap();
    assert_eq!(ledger.summary(stored), (1, 4));
}

#[tokio::test]
async fn upsert_is_visible_before_remote_completion_and_syncs_after() {
    let remote = Arc::new(MemoryRemoteCatalog::new());
    let dir = tempfile::tempdir().unwrap();
    let mut store = ContentStore::new(Mirror::at_dir(dir.path()), remote.clone());
    store.load().await;

    // local phase only: durable in memory and mirror, remote untouched
    let item = store
        .apply_upsert(Role::Admin, new_item("course_x", ContentType::Course, "X"))
        .unwrap();
    assert!(store.find_by_id("course_x").is_some());
    assert_eq!(store.sync_status("course_x"), Some(SyncStatus::Pending));
    assert!(!remote.records().iter().any(|r| r.id == "course_x"));

    // remote phase completes the two-phase commit
    store.push_item(&item.id).await;
    assert_eq!(store.sync_status("course_x"), Some(SyncStatus::Synced));
    assert!(remote.records().iter().any(|r| r.id == "course_x"));
}

#[tokio::test]
async fn failed_remote_phase_keeps_local_state_and_reports() {
    let remote = Arc::new(MemoryRemoteCatalog::new().with_fail_writes(true));
    let dir = tempfile::tempdir().unwrap();
    let mut store = ContentStore::new(Mirror::at_dir(dir.path()), remote.clone());

    store
        .upsert(Role::Admin, new_item("course_x", ContentType::Course, "X"))
        .await
        .unwrap();

    assert!(store.find_by_id("course_x").is_some());
    assert_eq!(store.sync_status("course_x"), Some(SyncStatus::Failed));
    assert!(store.error().is_some());

    // a later retry through the public remote phase succeeds
    remote.set_fail_writes(false);
    store.push_item("course_x").await;
    assert_eq!(store.sync_status("course_x"), Some(SyncStatus::Synced));
}

#[tokio::test]
async fn remote_edits_survive_an_offline_remount_via_the_mirror() {
    let mut shadow = default_catalog().remove(0);
    let id = shadow.id.clone();
    shadow.title = "Remote Revision".to_string();
    let remote =
        Arc::new(MemoryRemoteCatalog::new().with_records(vec![RemoteRecord::from(shadow)]));

    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = ContentStore::new(Mirror::at_dir(dir.path()), remote);
        store.load().await;
        assert_eq!(store.find_by_id(&id).unwrap().title, "Remote Revision");
    }

    // same device, backend now unreachable: the mirror carries the revision
    let mut offline = ContentStore::new(Mirror::at_dir(dir.path()), Arc::new(OfflineCatalog));
    offline.load().await;
    assert_eq!(offline.find_by_id(&id).unwrap().title, "Remote Revision");
    assert_eq!(offline.items().len(), 11);
}

#[tokio::test]
async fn non_admin_callers_cannot_mutate_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ContentStore::new(Mirror::at_dir(dir.path()), Arc::new(OfflineCatalog));
    store.load().await;

    assert!(store
        .upsert(Role::User, new_item("course_x", ContentType::Course, "X"))
        .await
        .is_err());
    assert!(store
        .delete(Role::User, "note_crypto_cheat_sheet")
        .await
        .is_err());
    assert_eq!(store.items().len(), 11);
    assert!(store.find_by_id("note_crypto_cheat_sheet").is_some());
}
