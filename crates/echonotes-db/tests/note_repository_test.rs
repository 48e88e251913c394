//! Integration tests for the PostgreSQL note repository.
//!
//! These tests need a reachable PostgreSQL with migrations applied:
//! `DATABASE_URL=... cargo test -p echonotes-db -- --ignored`

use echonotes_db::test_fixtures::test_database_url;
use echonotes_db::{Database, NewNote, NoteRepository, NoteUpdate};

async fn connect() -> Database {
    dotenvy::dotenv().ok();
    Database::connect(&test_database_url())
        .await
        .expect("Failed to connect to test database")
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_create_assigns_id_and_timestamp() {
    let db = connect().await;

    let a = db.notes.create(NewNote::new("first", "content a")).await.unwrap();
    let b = db.notes.create(NewNote::new("second", "content b")).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.summary, "");
    assert!(a.category.is_none());

    db.notes.delete(a.id).await.unwrap();
    db.notes.delete(b.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_create_then_get_round_trip() {
    let db = connect().await;

    let created = db
        .notes
        .create(
            NewNote::new("Groceries", "Buy milk, eggs, and bread.")
                .with_summary("Shopping")
                .with_category(Some("Tasks".to_string())),
        )
        .await
        .unwrap();

    let fetched = db.notes.get(created.id).await.unwrap().expect("note exists");
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.content, created.content);
    assert_eq!(fetched.summary, created.summary);
    assert_eq!(fetched.category, created.category);

    db.notes.delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_partial_update_keeps_other_fields() {
    let db = connect().await;

    let created = db
        .notes
        .create(NewNote::new("title", "content").with_summary("summary"))
        .await
        .unwrap();

    let updated = db
        .notes
        .update(created.id, NoteUpdate::category("Work"))
        .await
        .unwrap()
        .expect("note exists");

    assert_eq!(updated.category.as_deref(), Some("Work"));
    assert_eq!(updated.title, "title");
    assert_eq!(updated.content, "content");
    assert_eq!(updated.summary, "summary");
    assert_eq!(updated.created_at, created.created_at);

    // Empty strings leave fields untouched
    let unchanged = db
        .notes
        .update(created.id, NoteUpdate::summary(""))
        .await
        .unwrap()
        .expect("note exists");
    assert_eq!(unchanged.summary, "summary");

    db.notes.delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_delete_is_final() {
    let db = connect().await;

    let created = db.notes.create(NewNote::new("t", "c")).await.unwrap();

    let deleted = db.notes.delete(created.id).await.unwrap();
    assert_eq!(deleted.map(|n| n.id), Some(created.id));

    assert!(db.notes.get(created.id).await.unwrap().is_none());
    assert!(db.notes.delete(created.id).await.unwrap().is_none());
    assert!(db
        .notes
        .update(created.id, NoteUpdate::summary("x"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_list_all_orders_by_id() {
    let db = connect().await;

    let a = db.notes.create(NewNote::new("a", "c")).await.unwrap();
    let b = db.notes.create(NewNote::new("b", "c")).await.unwrap();

    let ids: Vec<i64> = db
        .notes
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .collect();
    let pos_a = ids.iter().position(|id| *id == a.id).unwrap();
    let pos_b = ids.iter().position(|id| *id == b.id).unwrap();
    assert!(pos_a < pos_b);

    db.notes.delete(a.id).await.unwrap();
    db.notes.delete(b.id).await.unwrap();
    db.close().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL with migrated database
async fn test_noop_update_reads_existing_and_missing_rows() {
    let db = connect().await;

    let created = db.notes.create(NewNote::new("t", "c")).await.unwrap();
    let same = db
        .notes
        .update(created.id, NoteUpdate::default())
        .await
        .unwrap()
        .expect("note exists");
    assert_eq!(same, created);

    db.notes.delete(created.id).await.unwrap();
    assert!(db
        .notes
        .update(created.id, NoteUpdate::default())
        .await
        .unwrap()
        .is_none());
}
