//! Bulk import behavior against the in-memory store

use pretty_assertions::assert_eq;
use quizdesk::content::import::import_lines;
use quizdesk::content::parser::LineError;
use quizdesk::content::{collections, subject_fields, topic_fields};
use quizdesk::store::{find_or_create, DocumentStore, FieldValue, MemoryStore};

#[tokio::test]
async fn five_line_batch_with_two_bad_lines_reports_three_saved() {
    let store = MemoryStore::new();
    let text = "Q1?,a,b,c,d,a\n\
                not,enough,fields\n\
                Q3?,a,b,c,d,c,with explanation\n\
                Q4?,a,b,c,d,nope\n\
                Q5?,a,b,c,d,d";

    let report = import_lines(&store, "subj", "top", text).await;

    assert_eq!(report.saved(), 3);
    assert_eq!(
        report.failures(),
        &[(2, LineError::BadFieldCount(3)), (4, LineError::AnswerNotInOptions)]
    );
    assert_eq!(store.len(collections::QUESTIONS).await, 3);
}

#[tokio::test]
async fn saved_questions_carry_the_resolved_ids_and_default_explanation() {
    let store = MemoryStore::new();
    import_lines(&store, "s-9", "t-4", "Q?,a,b,c,d,b").await;

    let docs = store
        .query_equal(collections::QUESTIONS, &Default::default())
        .await
        .expect("query should succeed");
    assert_eq!(docs.len(), 1);

    let fields = &docs[0].fields;
    assert_eq!(fields.get("subjectId"), Some(&FieldValue::str("s-9")));
    assert_eq!(fields.get("topicId"), Some(&FieldValue::str("t-4")));
    assert_eq!(fields.get("correctAnswer"), Some(&FieldValue::str("b")));
    assert_eq!(fields.get("explanation"), Some(&FieldValue::str("N/A")));
    assert!(fields.contains_key("timestamp"));
}

#[tokio::test]
async fn batches_always_run_to_the_last_line() {
    let store = MemoryStore::new();
    let text = "bad\nbad\nbad\nQ?,a,b,c,d,a";
    let report = import_lines(&store, "s", "t", text).await;

    assert_eq!(report.saved(), 1);
    assert_eq!(report.failures().len(), 3);
}

#[tokio::test]
async fn subject_and_topic_resolution_is_shared_across_batches() {
    // Two submissions for the same subject/topic names must not create
    // duplicate subject or topic records.
    let store = MemoryStore::new();

    let s1 = find_or_create(&store, collections::SUBJECTS, subject_fields("History"))
        .await
        .expect("create subject");
    let t1 = find_or_create(&store, collections::TOPICS, topic_fields("WW2", &s1))
        .await
        .expect("create topic");
    import_lines(&store, &s1, &t1, "Q1?,a,b,c,d,a").await;

    let s2 = find_or_create(&store, collections::SUBJECTS, subject_fields("History"))
        .await
        .expect("find subject");
    let t2 = find_or_create(&store, collections::TOPICS, topic_fields("WW2", &s2))
        .await
        .expect("find topic");
    import_lines(&store, &s2, &t2, "Q2?,a,b,c,d,b").await;

    assert_eq!((s1, t1), (s2, t2));
    assert_eq!(store.len(collections::SUBJECTS).await, 1);
    assert_eq!(store.len(collections::TOPICS).await, 1);
    assert_eq!(store.len(collections::QUESTIONS).await, 2);
}
