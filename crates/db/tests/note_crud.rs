//! Integration tests for note CRUD operations.
//!
//! Exercises `NoteRepo` against a real database:
//! - Create with and without content
//! - Ordering of the list by last update
//! - Partial updates and timestamp refresh
//! - Not-found behaviour for update and delete

use std::time::Duration;

use assert_matches::assert_matches;
use notes_db::models::note::{CreateNote, UpdateNote};
use notes_db::repositories::NoteRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_note(title: &str, content: Option<&str>) -> CreateNote {
    CreateNote {
        title: title.to_string(),
        content: content.map(str::to_string),
    }
}

async fn setup(pool: &PgPool) {
    notes_db::ensure_schema(pool).await.unwrap();
}

/// Postgres `NOW()` has microsecond resolution; make sure consecutive
/// statements land on distinct timestamps.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_create_defaults_content_and_timestamps(pool: PgPool) {
    setup(&pool).await;

    let note = NoteRepo::create(&pool, &new_note("Groceries", None))
        .await
        .unwrap();

    assert!(note.id > 0);
    assert_eq!(note.title, "Groceries");
    assert_eq!(note.content, "");
    assert_eq!(note.created_at, note.updated_at);
}

#[sqlx::test(migrations = false)]
async fn test_create_keeps_supplied_content(pool: PgPool) {
    setup(&pool).await;

    let note = NoteRepo::create(&pool, &new_note("Groceries", Some("milk, eggs")))
        .await
        .unwrap();

    assert_eq!(note.content, "milk, eggs");
}

#[sqlx::test(migrations = false)]
async fn test_find_after_create_returns_equal_note(pool: PgPool) {
    setup(&pool).await;

    let created = NoteRepo::create(&pool, &new_note("Reading list", Some("SICP")))
        .await
        .unwrap();
    let found = NoteRepo::find_by_id(&pool, created.id).await.unwrap();

    assert_eq!(found, Some(created));
}

#[sqlx::test(migrations = false)]
async fn test_find_missing_returns_none(pool: PgPool) {
    setup(&pool).await;

    let found = NoteRepo::find_by_id(&pool, 999_999).await.unwrap();
    assert_matches!(found, None);
}

#[sqlx::test(migrations = false)]
async fn test_ids_are_increasing_and_not_reused(pool: PgPool) {
    setup(&pool).await;

    let first = NoteRepo::create(&pool, &new_note("first", None)).await.unwrap();
    assert!(NoteRepo::delete(&pool, first.id).await.unwrap());

    let second = NoteRepo::create(&pool, &new_note("second", None)).await.unwrap();
    assert!(second.id > first.id, "ids must never be reused after delete");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_list_empty(pool: PgPool) {
    setup(&pool).await;

    let notes = NoteRepo::list(&pool).await.unwrap();
    assert!(notes.is_empty());
}

#[sqlx::test(migrations = false)]
async fn test_list_orders_most_recent_first(pool: PgPool) {
    setup(&pool).await;

    let a = NoteRepo::create(&pool, &new_note("A", None)).await.unwrap();
    tick().await;
    let b = NoteRepo::create(&pool, &new_note("B", None)).await.unwrap();
    tick().await;
    let c = NoteRepo::create(&pool, &new_note("C", None)).await.unwrap();

    let ids: Vec<i64> = NoteRepo::list(&pool)
        .await
        .unwrap()
        .iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[sqlx::test(migrations = false)]
async fn test_update_moves_note_to_front_of_list(pool: PgPool) {
    setup(&pool).await;

    let a = NoteRepo::create(&pool, &new_note("A", None)).await.unwrap();
    tick().await;
    let b = NoteRepo::create(&pool, &new_note("B", None)).await.unwrap();
    tick().await;

    let update = UpdateNote {
        content: Some("touched".into()),
        ..Default::default()
    };
    NoteRepo::update(&pool, a.id, &update).await.unwrap();

    let ids: Vec<i64> = NoteRepo::list(&pool)
        .await
        .unwrap()
        .iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_update_content_only_keeps_title(pool: PgPool) {
    setup(&pool).await;

    let created = NoteRepo::create(&pool, &new_note("Plan", Some("draft")))
        .await
        .unwrap();
    tick().await;

    let update = UpdateNote {
        title: None,
        content: Some("final".into()),
    };
    let updated = NoteRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .expect("note should exist");

    assert_eq!(updated.title, "Plan");
    assert_eq!(updated.content, "final");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[sqlx::test(migrations = false)]
async fn test_update_title_only_keeps_content(pool: PgPool) {
    setup(&pool).await;

    let created = NoteRepo::create(&pool, &new_note("Plan", Some("draft")))
        .await
        .unwrap();

    let update = UpdateNote {
        title: Some("Renamed".into()),
        content: None,
    };
    let updated = NoteRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.content, "draft");
}

#[sqlx::test(migrations = false)]
async fn test_update_can_clear_content(pool: PgPool) {
    setup(&pool).await;

    let created = NoteRepo::create(&pool, &new_note("Plan", Some("draft")))
        .await
        .unwrap();

    let update = UpdateNote {
        title: None,
        content: Some(String::new()),
    };
    let updated = NoteRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.content, "");
}

#[sqlx::test(migrations = false)]
async fn test_update_missing_returns_none_and_mutates_nothing(pool: PgPool) {
    setup(&pool).await;

    let existing = NoteRepo::create(&pool, &new_note("Keep", None)).await.unwrap();

    let update = UpdateNote {
        title: Some("Nope".into()),
        content: None,
    };
    let result = NoteRepo::update(&pool, existing.id + 1000, &update)
        .await
        .unwrap();
    assert_matches!(result, None);

    let reread = NoteRepo::find_by_id(&pool, existing.id).await.unwrap();
    assert_eq!(reread, Some(existing));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_delete_then_find_and_delete_again(pool: PgPool) {
    setup(&pool).await;

    let note = NoteRepo::create(&pool, &new_note("Ephemeral", None))
        .await
        .unwrap();

    assert!(NoteRepo::delete(&pool, note.id).await.unwrap());
    assert_matches!(NoteRepo::find_by_id(&pool, note.id).await.unwrap(), None);
    assert!(!NoteRepo::delete(&pool, note.id).await.unwrap());
}

#[sqlx::test(migrations = false)]
async fn test_delete_missing_leaves_other_rows(pool: PgPool) {
    setup(&pool).await;

    NoteRepo::create(&pool, &new_note("Keep", None)).await.unwrap();

    assert!(!NoteRepo::delete(&pool, 424_242).await.unwrap());
    assert_eq!(NoteRepo::count(&pool).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_note_serializes_with_wire_field_names(pool: PgPool) {
    setup(&pool).await;

    let note = NoteRepo::create(&pool, &new_note("Wire", Some("format")))
        .await
        .unwrap();
    let json = serde_json::to_value(&note).unwrap();

    assert_eq!(json["id"], note.id);
    assert_eq!(json["title"], "Wire");
    assert_eq!(json["content"], "format");
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_string());
}
