use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Name of the setting holding the insertion timestamp of the last consumed word.
pub const QUEUE_CURSOR: &str = "queue_cursor";

/// Setting model - a named counter that only moves forward
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: i64,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// Find setting by name
    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM settings WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Raise the setting to `value` if that is larger than what is stored
    ///
    /// Equal or smaller values leave both `value` and `updated_at` untouched,
    /// so repeating an advance is a no-op.
    pub async fn advance(name: &str, value: i64, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO settings (name, value, updated_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (name) DO UPDATE
             SET value = GREATEST(settings.value, EXCLUDED.value),
                 updated_at = CASE
                     WHEN EXCLUDED.value > settings.value THEN EXCLUDED.updated_at
                     ELSE settings.updated_at
                 END
             RETURNING *",
        )
        .bind(name)
        .bind(value)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
