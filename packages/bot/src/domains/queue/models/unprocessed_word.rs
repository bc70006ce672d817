use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// UnprocessedWord model - a word waiting in the queue
///
/// Words are consumed in `insertion_timestamp` order. The timestamp is
/// assigned at load time, is strictly positive and unique per word.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct UnprocessedWord {
    #[builder(default = Uuid::new_v4())]
    pub id: Uuid,
    pub characters: String,
    pub pinyin: String,
    /// Definitions separated by `;`
    #[builder(default, setter(strip_option))]
    pub annotation: Option<String>,
    pub insertion_timestamp: i64,
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl UnprocessedWord {
    /// Find the oldest word inserted strictly after the given timestamp
    pub async fn find_first_after(cursor: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM unprocessed_words
             WHERE insertion_timestamp > $1
             ORDER BY insertion_timestamp ASC
             LIMIT 1",
        )
        .bind(cursor)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new word; an existing id is left untouched
    ///
    /// Returns whether a row was inserted.
    pub async fn insert(&self, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO unprocessed_words (
                id,
                characters,
                pinyin,
                annotation,
                insertion_timestamp,
                created_at
             )
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(self.id)
        .bind(&self.characters)
        .bind(&self.pinyin)
        .bind(&self.annotation)
        .bind(self.insertion_timestamp)
        .bind(self.created_at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete word by ID (no-op if already gone)
    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM unprocessed_words WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Number of words left in the queue
    pub async fn count(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM unprocessed_words")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Largest insertion timestamp still in the queue
    pub async fn max_insertion_timestamp(pool: &PgPool) -> Result<Option<i64>> {
        sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(insertion_timestamp) FROM unprocessed_words")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Definitions from the annotation, in order, without blanks
    pub fn definitions(&self) -> Vec<&str> {
        self.annotation
            .as_deref()
            .map(|a| {
                a.split(';')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
