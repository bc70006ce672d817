// TestDependencies - in-memory implementations for testing
//
// Provides a word store and publisher that can be injected into BotDeps for
// tests, with failure injection and call recording.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{BasePublisher, BaseWordStore, PublishError};
use crate::domains::queue::models::{Setting, UnprocessedWord};
use crate::domains::tweets::body::PostMessage;
use crate::domains::tweets::models::Tweet;

// =============================================================================
// Memory Word Store
// =============================================================================

/// Store operations, used to inject failures and count calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    NextWord,
    InsertWord,
    DeleteWord,
    FindSetting,
    AdvanceSetting,
    FindTweet,
    FindTweetsOnDate,
    CountTweetsOnDate,
    TweetDatesBefore,
    UpsertTweet,
}

#[derive(Default)]
struct MemoryState {
    /// Queue keyed by insertion timestamp
    words: BTreeMap<i64, UnprocessedWord>,
    settings: HashMap<String, Setting>,
    /// Primary tweet records
    tweets: HashMap<Uuid, Tweet>,
    /// Date index, kept as separate copies so it can drift from the primary
    date_index: BTreeMap<NaiveDate, Vec<Tweet>>,
    failures: HashMap<StoreOp, u32>,
    calls: Vec<StoreOp>,
    skip_date_index: bool,
}

impl MemoryState {
    fn enter(&mut self, op: StoreOp) -> Result<()> {
        self.calls.push(op);
        if let Some(remaining) = self.failures.get_mut(&op) {
            if *remaining > 0 {
                *remaining -= 1;
                bail!("injected {:?} failure", op);
            }
        }
        Ok(())
    }
}

/// In-memory BaseWordStore
#[derive(Clone, Default)]
pub struct MemoryWordStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the queue
    pub fn with_words(self, words: Vec<UnprocessedWord>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for word in words {
                state.words.insert(word.insertion_timestamp, word);
            }
        }
        self
    }

    /// Seed the history, writing both the primary record and the date index
    pub fn with_tweets(self, tweets: Vec<Tweet>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for tweet in tweets {
                state.tweets.insert(tweet.id, tweet.clone());
                state.date_index.entry(tweet.date).or_default().push(tweet);
            }
        }
        self
    }

    /// Make the next `times` calls of `op` fail
    pub fn with_failure(self, op: StoreOp, times: u32) -> Self {
        self.fail_next(op, times);
        self
    }

    /// Make the next `times` calls of `op` fail
    pub fn fail_next(&self, op: StoreOp, times: u32) {
        self.state.lock().unwrap().failures.insert(op, times);
    }

    /// Stop updating the date index on upsert (simulates a lagging index)
    pub fn skip_date_index_writes(&self) {
        self.state.lock().unwrap().skip_date_index = true;
    }

    /// Words still queued, in insertion order
    pub fn queued_words(&self) -> Vec<UnprocessedWord> {
        self.state.lock().unwrap().words.values().cloned().collect()
    }

    /// All primary tweet records, by date then date entry
    pub fn tweets(&self) -> Vec<Tweet> {
        let mut tweets: Vec<Tweet> = self.state.lock().unwrap().tweets.values().cloned().collect();
        tweets.sort_by_key(|t| (t.date, t.date_entry));
        tweets
    }

    /// Number of entries in the date index for a date
    pub fn date_index_len(&self, date: NaiveDate) -> usize {
        self.state
            .lock()
            .unwrap()
            .date_index
            .get(&date)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn setting(&self, name: &str) -> Option<Setting> {
        self.state.lock().unwrap().settings.get(name).cloned()
    }

    /// Number of times `op` was called, including failed calls
    pub fn call_count(&self, op: StoreOp) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == op)
            .count()
    }
}

#[async_trait]
impl BaseWordStore for MemoryWordStore {
    async fn next_word_after(&self, cursor: i64) -> Result<Option<UnprocessedWord>> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::NextWord)?;
        Ok(state
            .words
            .range((cursor.saturating_add(1))..)
            .next()
            .map(|(_, w)| w.clone()))
    }

    async fn insert_word(&self, word: &UnprocessedWord) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::InsertWord)?;
        if state.words.values().any(|w| w.id == word.id) {
            return Ok(false);
        }
        if state.words.contains_key(&word.insertion_timestamp) {
            bail!(
                "duplicate insertion timestamp {}",
                word.insertion_timestamp
            );
        }
        state.words.insert(word.insertion_timestamp, word.clone());
        Ok(true)
    }

    async fn delete_word(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::DeleteWord)?;
        state.words.retain(|_, w| w.id != id);
        Ok(())
    }

    async fn find_setting(&self, name: &str) -> Result<Option<Setting>> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::FindSetting)?;
        Ok(state.settings.get(name).cloned())
    }

    async fn advance_setting(&self, name: &str, value: i64) -> Result<Setting> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::AdvanceSetting)?;
        let setting = state
            .settings
            .entry(name.to_string())
            .or_insert_with(|| Setting {
                name: name.to_string(),
                value,
                updated_at: Utc::now(),
            });
        if value > setting.value {
            setting.value = value;
            setting.updated_at = Utc::now();
        }
        Ok(setting.clone())
    }

    async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::FindTweet)?;
        Ok(state.tweets.get(&id).cloned())
    }

    async fn find_tweets_on_date(&self, date: NaiveDate) -> Result<Vec<Tweet>> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::FindTweetsOnDate)?;
        let mut tweets = state.date_index.get(&date).cloned().unwrap_or_default();
        tweets.sort_by_key(|t| (t.date_entry, t.created_at));
        Ok(tweets)
    }

    async fn count_tweets_on_date(&self, date: NaiveDate) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::CountTweetsOnDate)?;
        Ok(state.date_index.get(&date).map(Vec::len).unwrap_or(0) as i64)
    }

    async fn tweet_dates_before(&self, date: NaiveDate) -> Result<Vec<NaiveDate>> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::TweetDatesBefore)?;
        Ok(state
            .date_index
            .range(..date)
            .filter(|(_, tweets)| !tweets.is_empty())
            .map(|(d, _)| *d)
            .collect())
    }

    async fn upsert_tweet(&self, tweet: &Tweet) -> Result<Tweet> {
        let mut state = self.state.lock().unwrap();
        state.enter(StoreOp::UpsertTweet)?;
        state.tweets.insert(tweet.id, tweet.clone());
        if !state.skip_date_index {
            for tweets in state.date_index.values_mut() {
                tweets.retain(|t| t.id != tweet.id);
            }
            state
                .date_index
                .entry(tweet.date)
                .or_default()
                .push(tweet.clone());
        }
        Ok(tweet.clone())
    }
}

// =============================================================================
// Mock Publisher
// =============================================================================

pub struct MockPublisher {
    username: String,
    published: Arc<Mutex<Vec<PostMessage>>>,
    /// Upcoming publish failures; `true` means retryable
    failures: Arc<Mutex<VecDeque<bool>>>,
    missing: Arc<Mutex<HashSet<String>>>,
    exists_checks: Arc<Mutex<Vec<String>>>,
    next_id: AtomicU64,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            username: "testbot".to_string(),
            published: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            missing: Arc::new(Mutex::new(HashSet::new())),
            exists_checks: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Fail the next `times` publish calls
    pub fn with_publish_failures(self, times: usize, retryable: bool) -> Self {
        self.failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat(retryable).take(times));
        self
    }

    /// Report the given post as deleted
    pub fn with_missing_post(self, post_id: &str) -> Self {
        self.missing.lock().unwrap().insert(post_id.to_string());
        self
    }

    /// Messages that were successfully published
    pub fn published(&self) -> Vec<PostMessage> {
        self.published.lock().unwrap().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    /// Post ids passed to `post_exists`
    pub fn exists_checks(&self) -> Vec<String> {
        self.exists_checks.lock().unwrap().clone()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePublisher for MockPublisher {
    async fn publish(&self, message: &PostMessage) -> Result<String, PublishError> {
        if let Some(retryable) = self.failures.lock().unwrap().pop_front() {
            let err = anyhow::anyhow!("injected publish failure");
            return Err(if retryable {
                PublishError::Retryable(err)
            } else {
                PublishError::Rejected(err)
            });
        }

        self.published.lock().unwrap().push(message.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("tweet-{}", id))
    }

    async fn post_exists(&self, post_id: &str) -> Result<bool, PublishError> {
        self.exists_checks.lock().unwrap().push(post_id.to_string());
        Ok(!self.missing.lock().unwrap().contains(post_id))
    }

    fn post_url(&self, post_id: &str) -> String {
        twitter::tweet_url(&self.username, post_id)
    }
}
