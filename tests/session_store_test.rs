//! Session store lifecycle: cursor reads, eviction, handle release

mod common;

use std::time::Duration;

use common::{StubPage, was_released};
use pagescout::{LoadMoreOutcome, ScoutConfig, ScrapeError, SessionStore};

fn small_store() -> SessionStore {
    SessionStore::new(ScoutConfig::default().with_chunk_chars(5))
}

#[tokio::test]
async fn visit_returns_formatted_first_chunk() {
    let store = small_store();
    let outcome = store
        .create_session("https://example.com", "abcdefgh", None)
        .await;

    assert_eq!(outcome.total_chunks, 2);
    assert!(outcome.has_more_chunks);
    // First chunk is full size, so it carries the continuation marker
    assert_eq!(outcome.content, "Chunk 0\nabcde...");
}

#[tokio::test]
async fn load_more_visits_chunks_monotonically() {
    let store = small_store();
    // 23 chars -> chunks 0..=4, last one short
    store
        .create_session("https://example.com", &"a".repeat(23), None)
        .await;

    let mut last_chunk_reports = 0;
    for expected in 1..5 {
        match store.load_more().await.unwrap() {
            LoadMoreOutcome::Next {
                chunk_index,
                has_more_chunks,
                ..
            } => {
                assert_eq!(chunk_index, expected);
                if !has_more_chunks {
                    last_chunk_reports += 1;
                    assert_eq!(expected, 4);
                }
            }
            LoadMoreOutcome::Complete { .. } => panic!("completed before the final chunk"),
        }
    }
    assert_eq!(last_chunk_reports, 1);

    // Reading past the end is terminal, not an error
    match store.load_more().await.unwrap() {
        LoadMoreOutcome::Complete { chunk_index } => assert_eq!(chunk_index, 4),
        LoadMoreOutcome::Next { .. } => panic!("expected terminal outcome"),
    }
}

#[tokio::test]
async fn read_chunk_is_random_access() {
    let store = small_store();
    let alphabet: String = ('a'..='z').collect();
    store
        .create_session("https://example.com", &alphabet, None)
        .await;

    let read = store.read_chunk(3).await.unwrap();
    assert_eq!(read.content, "pqrst");
    assert_eq!(read.chunk_index, 3);
    assert_eq!(read.total_chunks, 6);
    assert_eq!(read.chunk_size, 5);

    // Random access did not move the linear cursor
    match store.load_more().await.unwrap() {
        LoadMoreOutcome::Next {
            chunk_index,
            content,
            ..
        } => {
            assert_eq!(chunk_index, 1);
            assert_eq!(content, "Chunk 1\nfghij...");
        }
        LoadMoreOutcome::Complete { .. } => panic!("expected chunk 1"),
    }
}

#[tokio::test]
async fn read_chunk_out_of_range_names_valid_bounds() {
    let store = small_store();
    let alphabet: String = ('a'..='z').collect();
    store
        .create_session("https://example.com", &alphabet, None)
        .await;

    let err = store.read_chunk(-1).await.unwrap_err();
    assert!(matches!(err, ScrapeError::ChunkOutOfRange { .. }));
    assert_eq!(
        err.to_string(),
        "Chunk index -1 is out of range. Available chunks: 0 to 5"
    );

    let err = store.read_chunk(6).await.unwrap_err();
    assert!(err.to_string().contains("0 to 5"));
}

#[tokio::test]
async fn empty_document_yields_single_empty_chunk() {
    let store = small_store();
    let outcome = store.create_session("https://example.com", "", None).await;

    assert_eq!(outcome.total_chunks, 1);
    assert!(!outcome.has_more_chunks);
    assert_eq!(outcome.content, "Chunk 0\n");

    let read = store.read_chunk(0).await.unwrap();
    assert_eq!(read.chunk_size, 0);

    match store.load_more().await.unwrap() {
        LoadMoreOutcome::Complete { chunk_index } => assert_eq!(chunk_index, 0),
        LoadMoreOutcome::Next { .. } => panic!("empty document has nothing to load"),
    }
}

#[tokio::test]
async fn calls_without_visit_report_no_active_session() {
    let store = small_store();

    let err = store.load_more().await.unwrap_err();
    assert!(matches!(err, ScrapeError::NoActiveSession));
    assert!(err.to_string().contains("No active session"));

    let err = store.snapshot_current().await.unwrap_err();
    assert!(matches!(err, ScrapeError::NoActiveSession));

    let err = store.read_chunk(0).await.unwrap_err();
    assert!(matches!(err, ScrapeError::NoActiveSession));
}

#[tokio::test]
async fn expired_sessions_are_unreachable() {
    let store = SessionStore::new(
        ScoutConfig::default()
            .with_chunk_chars(5)
            .with_session_timeout(Duration::from_millis(50)),
    );
    let outcome = store
        .create_session("https://example.com", "abcdefgh", None)
        .await;

    tokio::time::sleep(Duration::from_millis(80)).await;

    // The dangling current pointer names the session that disappeared
    let err = store.load_more().await.unwrap_err();
    match err {
        ScrapeError::SessionNotFound(id) => assert_eq!(id, outcome.session_id),
        other => panic!("expected SessionNotFound, got {other}"),
    }
    assert_eq!(store.session_count().await, 0);
}

#[tokio::test]
async fn access_refreshes_last_used() {
    let store = SessionStore::new(
        ScoutConfig::default()
            .with_chunk_chars(5)
            .with_session_timeout(Duration::from_millis(100)),
    );
    store
        .create_session("https://example.com", &"a".repeat(23), None)
        .await;

    // Keep touching the session; it must stay alive past the raw timeout
    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(40)).await;
        store.read_chunk(0).await.unwrap();
    }
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn capacity_evicts_least_recently_used_and_releases_handle() {
    let store = SessionStore::new(
        ScoutConfig::default()
            .with_chunk_chars(5)
            .with_max_sessions(2),
    );

    let (page1, released1) = StubPage::new();
    store
        .create_session("https://one.example", "aaaa", Some(Box::new(page1)))
        .await;
    let (page2, released2) = StubPage::new();
    store
        .create_session("https://two.example", "bbbb", Some(Box::new(page2)))
        .await;
    let (page3, released3) = StubPage::new();
    store
        .create_session("https://three.example", "cccc", Some(Box::new(page3)))
        .await;

    assert_eq!(store.session_count().await, 2);
    assert!(was_released(&released1));
    assert!(!was_released(&released2));
    assert!(!was_released(&released3));
}

#[tokio::test]
async fn remove_session_releases_handle() {
    let store = small_store();
    let (page, released) = StubPage::new();
    let outcome = store
        .create_session("https://example.com", "abcdefgh", Some(Box::new(page)))
        .await;

    assert!(store.remove_session(&outcome.session_id).await);
    assert!(was_released(&released));
    assert!(!store.remove_session(&outcome.session_id).await);

    // The current pointer now dangles; later reads name the removed session
    let err = store.load_more().await.unwrap_err();
    assert!(err.to_string().contains(&outcome.session_id));
}

#[tokio::test]
async fn shutdown_drains_all_sessions() {
    let store = small_store();
    let (page1, released1) = StubPage::new();
    store
        .create_session("https://one.example", "aaaa", Some(Box::new(page1)))
        .await;
    let (page2, released2) = StubPage::new();
    store
        .create_session("https://two.example", "bbbb", Some(Box::new(page2)))
        .await;

    store.shutdown().await;
    assert_eq!(store.session_count().await, 0);
    assert!(was_released(&released1));
    assert!(was_released(&released2));
}
