// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Selection, recording and reference resolution are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseWordStore, BasePublisher)

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::domains::queue::models::{Setting, UnprocessedWord};
use crate::domains::tweets::body::PostMessage;
use crate::domains::tweets::models::Tweet;

// =============================================================================
// Word Store Trait (Infrastructure - durable queue, history and settings)
// =============================================================================

/// Durable storage for the three collections the bot works on.
///
/// Lookups that find nothing return `Ok(None)` or an empty list; `Err` is
/// reserved for transport and database failures.
#[async_trait]
pub trait BaseWordStore: Send + Sync {
    /// Oldest queued word with `insertion_timestamp > cursor`
    async fn next_word_after(&self, cursor: i64) -> Result<Option<UnprocessedWord>>;

    /// Queue a word (returns false if the id is already queued)
    async fn insert_word(&self, word: &UnprocessedWord) -> Result<bool>;

    /// Remove a word from the queue; removing a missing word succeeds
    async fn delete_word(&self, id: Uuid) -> Result<()>;

    async fn find_setting(&self, name: &str) -> Result<Option<Setting>>;

    /// Raise a setting to `value`; never lowers it
    async fn advance_setting(&self, name: &str, value: i64) -> Result<Setting>;

    /// Primary-key lookup
    async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>>;

    /// Date-index lookup, ordered by `date_entry`
    async fn find_tweets_on_date(&self, date: NaiveDate) -> Result<Vec<Tweet>>;

    async fn count_tweets_on_date(&self, date: NaiveDate) -> Result<i64>;

    /// Distinct dates with tweets strictly before `date`, ascending
    async fn tweet_dates_before(&self, date: NaiveDate) -> Result<Vec<NaiveDate>>;

    /// Insert or overwrite by id; returns the stored record
    async fn upsert_tweet(&self, tweet: &Tweet) -> Result<Tweet>;
}

// =============================================================================
// Publisher Trait (Infrastructure - social feed)
// =============================================================================

#[derive(Debug, Error)]
pub enum PublishError {
    /// Transport failure, rate limit or server error
    #[error("publish failed (retryable): {0}")]
    Retryable(#[source] anyhow::Error),

    /// The platform refused the request
    #[error("publish rejected: {0}")]
    Rejected(#[source] anyhow::Error),
}

impl PublishError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, PublishError::Retryable(_))
    }
}

#[async_trait]
pub trait BasePublisher: Send + Sync {
    /// Post the message and return the platform's post id
    async fn publish(&self, message: &PostMessage) -> std::result::Result<String, PublishError>;

    /// Whether a previously returned post id is still visible
    async fn post_exists(&self, post_id: &str) -> std::result::Result<bool, PublishError>;

    /// Public link to a post
    fn post_url(&self, post_id: &str) -> String;
}
