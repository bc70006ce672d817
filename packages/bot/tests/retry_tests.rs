//! Retries resume from the last completed step.

mod common;

use bot_core::domains::runs::{RunFailure, RunState};
use bot_core::kernel::{MemoryWordStore, MockPublisher, StoreOp};
use bot_core::RunSettings;
use common::*;

fn store_with_one_word() -> MemoryWordStore {
    MemoryWordStore::new().with_words(vec![word("苹果", "píngguǒ", 1)])
}

#[tokio::test]
async fn record_failure_is_retried_without_reposting() {
    let harness = TestHarness::new(
        store_with_one_word().with_failure(StoreOp::UpsertTweet, 1),
        MockPublisher::new(),
    );

    let report = harness.run_on(date(2024, 6, 1)).await;

    assert!(report.is_success(), "{:?}", report.error);
    assert_eq!(report.attempts, 2);
    assert_eq!(harness.publisher.publish_count(), 1);
    assert_eq!(harness.store.call_count(StoreOp::NextWord), 1);
    assert_eq!(harness.store.tweets().len(), 1);
    assert_eq!(report.tweet.map(|t| t.tweet_id), Some("tweet-1".to_string()));
}

#[tokio::test]
async fn transient_publish_failures_are_retried() {
    let harness = TestHarness::new(
        store_with_one_word(),
        MockPublisher::new().with_publish_failures(2, true),
    );

    let report = harness.run_on(date(2024, 6, 1)).await;

    assert!(report.is_success());
    assert_eq!(report.attempts, 3);
    assert_eq!(harness.publisher.publish_count(), 1);
    assert_eq!(harness.store.call_count(StoreOp::NextWord), 1);
    assert_eq!(harness.store.call_count(StoreOp::TweetDatesBefore), 1);
}

#[tokio::test]
async fn rejected_post_is_not_retried() {
    let harness = TestHarness::new(
        store_with_one_word(),
        MockPublisher::new().with_publish_failures(1, false),
    );

    let report = harness.run_on(date(2024, 6, 1)).await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.state, RunState::ReferencesResolved);
    assert!(matches!(
        report.error.as_ref().map(|e| &e.failure),
        Some(RunFailure::Publish(_))
    ));
    assert_eq!(harness.store.queued_words().len(), 1);
    assert!(harness.store.tweets().is_empty());
}

#[tokio::test]
async fn commit_failure_does_not_reselect_or_repost() {
    let harness = TestHarness::new(
        store_with_one_word().with_failure(StoreOp::AdvanceSetting, 1),
        MockPublisher::new(),
    );

    let report = harness.run_on(date(2024, 6, 1)).await;

    assert!(report.is_success());
    assert_eq!(report.attempts, 2);
    assert_eq!(harness.store.call_count(StoreOp::NextWord), 1);
    assert_eq!(harness.publisher.publish_count(), 1);
    assert!(harness.store.queued_words().is_empty());
    assert_eq!(harness.store.tweets().len(), 1);
}

#[tokio::test]
async fn exhausted_retries_after_posting_can_be_resumed() {
    let harness = TestHarness::new(
        store_with_one_word().with_failure(StoreOp::UpsertTweet, 3),
        MockPublisher::new(),
    );

    let report = harness.run_on(date(2024, 6, 1)).await;

    assert_eq!(report.attempts, 3);
    assert_eq!(report.state, RunState::Posted);
    let err = report.error.as_ref().unwrap();
    assert!(err.posted_unrecorded());
    assert_eq!(err.tweet_id.as_deref(), Some("tweet-1"));
    assert!(harness.store.tweets().is_empty());
    assert_eq!(harness.store.queued_words().len(), 1);

    let resumed = harness
        .orchestrator
        .run_with_retries(report.context)
        .await;

    assert!(resumed.is_success(), "{:?}", resumed.error);
    assert_eq!(harness.publisher.publish_count(), 1);
    assert_eq!(harness.store.tweets().len(), 1);
    assert!(harness.store.queued_words().is_empty());
}

#[tokio::test]
async fn selection_failure_is_retried() {
    let harness = TestHarness::new(
        store_with_one_word().with_failure(StoreOp::NextWord, 1),
        MockPublisher::new(),
    );

    let report = harness.run_on(date(2024, 6, 1)).await;

    assert!(report.is_success());
    assert_eq!(report.attempts, 2);
    assert_eq!(harness.store.call_count(StoreOp::NextWord), 2);
    assert_eq!(harness.publisher.publish_count(), 1);
}

#[tokio::test]
async fn inconsistent_record_stops_the_run() {
    let store = store_with_one_word();
    store.skip_date_index_writes();
    let harness = TestHarness::new(store, MockPublisher::new());

    let report = harness.run_on(date(2024, 6, 1)).await;

    assert_eq!(report.attempts, 1);
    assert_eq!(report.state, RunState::Posted);
    assert!(matches!(
        report.error.as_ref().map(|e| &e.failure),
        Some(RunFailure::InconsistentRecord { .. })
    ));
    assert_eq!(harness.publisher.publish_count(), 1);
    assert_eq!(harness.store.queued_words().len(), 1);
}

#[tokio::test]
async fn next_invocation_commits_a_recorded_word_without_reposting() {
    let harness = TestHarness::new(
        MemoryWordStore::new()
            .with_words(vec![word("苹果", "píngguǒ", 1), word("桌子", "zhuōzi", 2)])
            .with_failure(StoreOp::AdvanceSetting, 3),
        MockPublisher::new(),
    );
    let today = date(2024, 6, 1);

    let failed = harness.run_on(today).await;
    assert_eq!(failed.attempts, 3);
    assert_eq!(failed.state, RunState::Recorded);
    assert_eq!(harness.store.tweets().len(), 1);
    assert_eq!(harness.store.queued_words().len(), 2);

    let next = harness.run_on(today).await;
    assert!(next.is_success(), "{:?}", next.error);
    assert_eq!(next.attempts, 1);
    assert_eq!(next.tweet.map(|t| t.tweet_id), Some("tweet-1".to_string()));
    assert_eq!(harness.publisher.publish_count(), 1);
    assert_eq!(harness.store.tweets().len(), 1);
    let left: Vec<String> = harness
        .store
        .queued_words()
        .into_iter()
        .map(|w| w.characters)
        .collect();
    assert_eq!(left, vec!["桌子"]);

    let third = harness.run_on(today).await;
    assert!(third.is_success());
    let texts: Vec<String> = harness
        .publisher
        .published()
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec!["苹果 (píngguǒ)", "桌子 (zhuōzi)"]);
    assert!(harness.store.queued_words().is_empty());
}

#[tokio::test]
async fn recorded_word_is_committed_even_at_the_daily_limit() {
    let harness = TestHarness::with_settings(
        store_with_one_word().with_failure(StoreOp::AdvanceSetting, 3),
        MockPublisher::new(),
        RunSettings {
            tweets_per_day: 1,
            ..test_settings()
        },
    );
    let today = date(2024, 6, 1);

    let failed = harness.run_on(today).await;
    assert_eq!(failed.state, RunState::Recorded);

    let next = harness.run_on(today).await;
    assert!(next.is_success(), "{:?}", next.error);
    assert_eq!(harness.publisher.publish_count(), 1);
    assert!(harness.store.queued_words().is_empty());
}
