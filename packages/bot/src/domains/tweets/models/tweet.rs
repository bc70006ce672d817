use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Tweet model - one posted word
///
/// `id` is the id of the queue word that was posted, so recording the same
/// word twice overwrites the first record. `date_entry` orders tweets posted
/// on the same `date`, starting at 0.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub id: Uuid,
    /// Platform-assigned id of the post
    pub tweet_id: String,
    pub date: NaiveDate,
    pub date_entry: i32,
    pub word: String,
    pub pinyin: String,
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    /// Find tweet by ID
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tweets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all tweets posted on a date, in posting order
    pub async fn find_on_date(date: NaiveDate, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM tweets
             WHERE date = $1
             ORDER BY date_entry ASC, created_at ASC",
        )
        .bind(date)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Count tweets posted on a date
    pub async fn count_on_date(date: NaiveDate, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tweets WHERE date = $1")
            .bind(date)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Distinct dates with at least one tweet, strictly before `date`
    pub async fn dates_before(date: NaiveDate, pool: &PgPool) -> Result<Vec<NaiveDate>> {
        sqlx::query_scalar::<_, NaiveDate>(
            "SELECT DISTINCT date FROM tweets WHERE date < $1 ORDER BY date ASC",
        )
        .bind(date)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert the tweet, or overwrite the record with the same id
    pub async fn upsert(&self, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO tweets (id, tweet_id, date, date_entry, word, pinyin, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE
             SET tweet_id = EXCLUDED.tweet_id,
                 date = EXCLUDED.date,
                 date_entry = EXCLUDED.date_entry,
                 word = EXCLUDED.word,
                 pinyin = EXCLUDED.pinyin,
                 created_at = EXCLUDED.created_at
             RETURNING *",
        )
        .bind(self.id)
        .bind(&self.tweet_id)
        .bind(self.date)
        .bind(self.date_entry)
        .bind(&self.word)
        .bind(&self.pinyin)
        .bind(self.created_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
