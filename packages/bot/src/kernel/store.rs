//! Postgres-backed word store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::queue::models::{Setting, UnprocessedWord};
use crate::domains::tweets::models::Tweet;
use crate::kernel::BaseWordStore;

/// BaseWordStore over the `unprocessed_words`, `tweets` and `settings` tables
#[derive(Clone)]
pub struct PostgresWordStore {
    pool: PgPool,
}

impl PostgresWordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseWordStore for PostgresWordStore {
    async fn next_word_after(&self, cursor: i64) -> Result<Option<UnprocessedWord>> {
        UnprocessedWord::find_first_after(cursor, &self.pool).await
    }

    async fn insert_word(&self, word: &UnprocessedWord) -> Result<bool> {
        word.insert(&self.pool).await
    }

    async fn delete_word(&self, id: Uuid) -> Result<()> {
        UnprocessedWord::delete(id, &self.pool).await
    }

    async fn find_setting(&self, name: &str) -> Result<Option<Setting>> {
        Setting::find_by_name(name, &self.pool).await
    }

    async fn advance_setting(&self, name: &str, value: i64) -> Result<Setting> {
        Setting::advance(name, value, &self.pool).await
    }

    async fn find_tweet(&self, id: Uuid) -> Result<Option<Tweet>> {
        Tweet::find_by_id(id, &self.pool).await
    }

    async fn find_tweets_on_date(&self, date: NaiveDate) -> Result<Vec<Tweet>> {
        Tweet::find_on_date(date, &self.pool).await
    }

    async fn count_tweets_on_date(&self, date: NaiveDate) -> Result<i64> {
        Tweet::count_on_date(date, &self.pool).await
    }

    async fn tweet_dates_before(&self, date: NaiveDate) -> Result<Vec<NaiveDate>> {
        Tweet::dates_before(date, &self.pool).await
    }

    async fn upsert_tweet(&self, tweet: &Tweet) -> Result<Tweet> {
        tweet.upsert(&self.pool).await
    }
}
