//! PostgreSQL note store integration tests.
//!
//! Require a reachable database (see `test_fixtures`). Run with:
//! `cargo test -p notekeep-db -- --ignored`

use notekeep_db::test_fixtures::{random_owner, sample_note, TestDatabase};
use notekeep_db::{Error, NoteFilter, NotePatch, NoteStats, NoteStore};

async fn setup() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_then_find_one() {
    let test_db = setup().await;
    let store = &test_db.db.notes;
    let owner = random_owner();

    let note = store
        .insert(owner, sample_note("Title", "Body", "Work", true))
        .await
        .expect("insert");
    let fetched = store
        .find_one(owner, &note.id.to_string())
        .await
        .expect("find_one");

    assert_eq!(fetched, note);
    assert_eq!(fetched.category, "Work");
    assert!(fetched.is_important);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_owner_isolation() {
    let test_db = setup().await;
    let store = &test_db.db.notes;
    let alice = random_owner();
    let bob = random_owner();

    let note = store
        .insert(alice, sample_note("Alice only", "private", "General", false))
        .await
        .unwrap();
    let id = note.id.to_string();

    assert!(store
        .find(bob, &NoteFilter::default(), 0, 10)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        store.find_one(bob, &id).await,
        Err(Error::NoteNotFound)
    ));
    assert!(!store.delete(bob, &id).await.unwrap());
    assert_eq!(store.aggregate(bob).await.unwrap(), NoteStats::default());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_filters_and_pagination_window() {
    let test_db = setup().await;
    let store = &test_db.db.notes;
    let owner = random_owner();

    store
        .insert(owner, sample_note("Shopping", "eggs and milk", "Home", false))
        .await
        .unwrap();
    store
        .insert(owner, sample_note("Sprint plan", "ship 100% of it", "Work", true))
        .await
        .unwrap();
    store
        .insert(owner, sample_note("Retro", "what went well", "Work", false))
        .await
        .unwrap();

    let work = NoteFilter {
        category: Some("Work".into()),
        ..Default::default()
    };
    assert_eq!(store.count(owner, &work).await.unwrap(), 2);

    let important_work = NoteFilter {
        category: Some("Work".into()),
        is_important: Some(true),
        search: None,
    };
    let found = store.find(owner, &important_work, 0, 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Sprint plan");

    // Content-only match, case-insensitive
    let search = NoteFilter {
        search: Some("MILK".into()),
        ..Default::default()
    };
    assert_eq!(store.count(owner, &search).await.unwrap(), 1);

    // Wildcards are literal
    let percent = NoteFilter {
        search: Some("100%".into()),
        ..Default::default()
    };
    assert_eq!(store.count(owner, &percent).await.unwrap(), 1);
    let underscore = NoteFilter {
        search: Some("_".into()),
        ..Default::default()
    };
    assert_eq!(store.count(owner, &underscore).await.unwrap(), 0);

    let page = store
        .find(owner, &NoteFilter::default(), 1, 1)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Sprint plan");
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_applies_patch_and_advances_timestamp() {
    let test_db = setup().await;
    let store = &test_db.db.notes;
    let owner = random_owner();

    let note = store
        .insert(owner, sample_note("Keep", "old", "Ideas", true))
        .await
        .unwrap();
    let updated = store
        .update(
            owner,
            &note.id.to_string(),
            NotePatch {
                content: Some("new".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.content, "new");
    assert_eq!(updated.title, "Keep");
    assert_eq!(updated.category, "Ideas");
    assert!(updated.is_important);
    assert!(updated.updated_at > note.updated_at);
    assert_eq!(updated.created_at, note.created_at);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_malformed_id_and_missing_id() {
    let test_db = setup().await;
    let store = &test_db.db.notes;
    let owner = random_owner();

    assert!(matches!(
        store.find_one(owner, "not-a-uuid").await,
        Err(Error::InvalidIdentifier(_))
    ));
    assert!(matches!(
        store
            .update(owner, "00000000-0000-0000-0000-000000000000", NotePatch::default())
            .await,
        Err(Error::NoteNotFound)
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_aggregate_single_query() {
    let test_db = setup().await;
    let store = &test_db.db.notes;
    let owner = random_owner();

    assert_eq!(store.aggregate(owner).await.unwrap(), NoteStats::default());

    store
        .insert(owner, sample_note("a", "a", "Work", true))
        .await
        .unwrap();
    store
        .insert(owner, sample_note("b", "b", "Home", false))
        .await
        .unwrap();
    store
        .insert(owner, sample_note("c", "c", "Work", false))
        .await
        .unwrap();

    let stats = store.aggregate(owner).await.unwrap();
    assert_eq!(stats.total_notes, 3);
    assert_eq!(stats.important_notes, 1);
    assert_eq!(stats.categories, vec!["Home", "Work"]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete_is_permanent() {
    let test_db = setup().await;
    let store = &test_db.db.notes;
    let owner = random_owner();

    let note = store
        .insert(owner, sample_note("gone", "soon", "General", false))
        .await
        .unwrap();
    let id = note.id.to_string();

    assert!(store.delete(owner, &id).await.unwrap());
    assert!(matches!(
        store.find_one(owner, &id).await,
        Err(Error::NoteNotFound)
    ));
}
