//! In-page search: determinism of continuation, cursor overwrite, eviction

use std::time::Duration;

use pagescout::{ScoutConfig, ScrapeError, SearchSlot, SessionStore};

fn store_and_slot(chunk_chars: usize) -> (SessionStore, SearchSlot) {
    let config = ScoutConfig::default().with_chunk_chars(chunk_chars);
    (SessionStore::new(config.clone()), SearchSlot::new(config))
}

const FIVE_THE: &str = "the cat the dog the bird the fish the mouse";

#[tokio::test]
async fn continuation_has_no_overlap_or_gap() {
    let (store, slot) = store_and_slot(10);
    store
        .create_session("https://example.com", FIVE_THE, None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();

    let first = slot.begin(&snapshot, "the", 2).await;
    assert_eq!(first.total_matches, 5);
    assert_eq!(first.snippets.len(), 2);
    let first_positions: Vec<usize> = first.snippets.iter().map(|s| s.position).collect();
    assert_eq!(first_positions, vec![0, 8]);

    let next = slot.continue_search(&store, 3).await.unwrap();
    assert_eq!(next.snippets.len(), 3);
    let next_positions: Vec<usize> = next.snippets.iter().map(|s| s.position).collect();
    assert_eq!(next_positions, vec![16, 25, 34]);
    assert_eq!(next.has_more_results, Some(false));

    // A further continuation delivers nothing and stays terminal
    let done = slot.continue_search(&store, 3).await.unwrap();
    assert!(done.snippets.is_empty());
    assert_eq!(done.has_more_results, Some(false));
}

#[tokio::test]
async fn matching_is_case_insensitive_and_overlapping() {
    let (store, slot) = store_and_slot(10);
    store
        .create_session("https://example.com", "aAaA", None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();

    let outcome = slot.begin(&snapshot, "aa", 10).await;
    assert_eq!(outcome.total_matches, 3);
    let positions: Vec<usize> = outcome.snippets.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn matches_cross_chunk_boundaries_and_attribute_chunks() {
    let (store, slot) = store_and_slot(10);
    // "0123456789" | "needle0123" - the match starts in chunk 1
    store
        .create_session("https://example.com", "0123456789needle0123", None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();

    let outcome = slot.begin(&snapshot, "NEEDLE", 5).await;
    assert_eq!(outcome.total_matches, 1);
    assert_eq!(outcome.snippets[0].position, 10);
    assert_eq!(outcome.snippets[0].chunk_index, 1);
    assert!(outcome.snippets[0].snippet.contains("[needle]"));
}

#[tokio::test]
async fn match_spanning_a_boundary_attributes_to_starting_chunk() {
    let (store, slot) = store_and_slot(5);
    // chunks: "abcne" | "edle!" - needle spans the boundary, starts in chunk 0
    store
        .create_session("https://example.com", "abcneedle!", None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();

    let outcome = slot.begin(&snapshot, "needle", 5).await;
    assert_eq!(outcome.total_matches, 1);
    assert_eq!(outcome.snippets[0].position, 3);
    assert_eq!(outcome.snippets[0].chunk_index, 0);
}

#[tokio::test]
async fn scan_is_capped_at_ten_times_requested_snippets() {
    let (store, slot) = store_and_slot(5000);
    store
        .create_session("https://example.com", &"x".repeat(500), None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();

    // Cap is 10 * num_snippets, a safety bound on the eager scan
    let outcome = slot.begin(&snapshot, "x", 2).await;
    assert_eq!(outcome.total_matches, 20);
    assert_eq!(outcome.snippets.len(), 2);
}

#[tokio::test]
async fn new_search_overwrites_the_cursor() {
    let (store, slot) = store_and_slot(100);
    store
        .create_session("https://example.com", FIVE_THE, None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();

    slot.begin(&snapshot, "the", 1).await;
    slot.begin(&snapshot, "cat", 1).await;

    let next = slot.continue_search(&store, 5).await.unwrap();
    assert_eq!(next.search_text, "cat");
    assert!(next.snippets.is_empty());
    assert_eq!(next.has_more_results, Some(false));
}

#[tokio::test]
async fn continuation_without_search_reports_no_active_search() {
    let (store, slot) = store_and_slot(100);
    let err = slot.continue_search(&store, 5).await.unwrap_err();
    assert!(matches!(err, ScrapeError::NoActiveSearch));
    assert!(err.to_string().contains("No active search"));
}

#[tokio::test]
async fn continuation_errors_when_session_was_evicted() {
    let config = ScoutConfig::default()
        .with_chunk_chars(100)
        .with_session_timeout(Duration::from_millis(50));
    let store = SessionStore::new(config.clone());
    let slot = SearchSlot::new(config);

    store
        .create_session("https://example.com", FIVE_THE, None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();
    slot.begin(&snapshot, "the", 1).await;

    tokio::time::sleep(Duration::from_millis(80)).await;

    let err = slot.continue_search(&store, 5).await.unwrap_err();
    assert!(matches!(err, ScrapeError::SessionNotFound(_)));
}

#[tokio::test]
async fn snippets_wrap_match_and_clamp_to_bounds() {
    let (store, slot) = store_and_slot(5000);
    store
        .create_session("https://example.com", "needle at the very start", None)
        .await;
    let snapshot = store.snapshot_current().await.unwrap();

    let outcome = slot.begin(&snapshot, "needle", 1).await;
    assert_eq!(
        outcome.snippets[0].snippet,
        "...[needle] at the very start..."
    );
}
