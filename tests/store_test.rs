//! Document store contract tests, exercised through the memory backend

use pretty_assertions::assert_eq;
use quizdesk::content::{collections, notice_fields, subject_fields, topic_fields, NOTICE_DOC_ID};
use quizdesk::store::{find_or_create, BlobStore, DocumentStore, FieldValue, MemoryBlobStore, MemoryStore};

#[tokio::test]
async fn find_or_create_is_idempotent_for_identical_fields() {
    let store = MemoryStore::new();

    let first = find_or_create(&store, collections::SUBJECTS, subject_fields("History"))
        .await
        .expect("first call");
    let second = find_or_create(&store, collections::SUBJECTS, subject_fields("History"))
        .await
        .expect("second call");

    assert_eq!(first, second);
    assert_eq!(store.len(collections::SUBJECTS).await, 1);
}

#[tokio::test]
async fn find_or_create_distinguishes_topics_by_subject_scope() {
    let store = MemoryStore::new();

    let in_history = find_or_create(&store, collections::TOPICS, topic_fields("Revolutions", "s-history"))
        .await
        .expect("history topic");
    let in_physics = find_or_create(&store, collections::TOPICS, topic_fields("Revolutions", "s-physics"))
        .await
        .expect("physics topic");

    assert_ne!(in_history, in_physics);
    assert_eq!(store.len(collections::TOPICS).await, 2);
}

#[tokio::test]
async fn find_or_create_returns_the_first_of_duplicate_matches() {
    // Duplicates can exist after racing writers; the lookup must settle on
    // the first match instead of creating a third record.
    let store = MemoryStore::new();
    let a = store
        .insert(collections::SUBJECTS, subject_fields("Math"))
        .await
        .expect("insert a");
    store
        .insert(collections::SUBJECTS, subject_fields("Math"))
        .await
        .expect("insert b");

    let found = find_or_create(&store, collections::SUBJECTS, subject_fields("Math"))
        .await
        .expect("lookup");
    assert_eq!(found, a);
    assert_eq!(store.len(collections::SUBJECTS).await, 2);
}

#[tokio::test]
async fn notice_upsert_overwrites_the_singleton_in_place() {
    let store = MemoryStore::new();

    store
        .upsert_merge(collections::CONFIG, NOTICE_DOC_ID, notice_fields("old news"))
        .await
        .expect("first upsert");
    store
        .upsert_merge(collections::CONFIG, NOTICE_DOC_ID, notice_fields("breaking news"))
        .await
        .expect("second upsert");

    assert_eq!(store.len(collections::CONFIG).await, 1);
    let doc = store
        .get(collections::CONFIG, NOTICE_DOC_ID)
        .await
        .expect("get")
        .expect("notice exists");
    assert_eq!(
        doc.fields.get("notificationText"),
        Some(&FieldValue::str("breaking news"))
    );
}

#[tokio::test]
async fn deleting_a_blob_twice_is_not_an_error() {
    let blobs = MemoryBlobStore::new();
    let url = blobs
        .upload("banners/banner_1.jpg", "image/jpeg", vec![0xff, 0xd8])
        .await
        .expect("upload");
    assert!(url.contains("banners/banner_1.jpg"));

    blobs.delete("banners/banner_1.jpg").await.expect("first delete");
    blobs.delete("banners/banner_1.jpg").await.expect("second delete");
}
