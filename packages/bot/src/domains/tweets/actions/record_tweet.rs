//! Record tweet action

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::domains::queue::models::UnprocessedWord;
use crate::domains::tweets::models::Tweet;
use crate::kernel::BaseWordStore;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    /// The write went through but the two lookup paths disagree
    #[error("tweet record {id} is inconsistent: {detail}")]
    Inconsistent { id: uuid::Uuid, detail: String },
}

/// Record that `word` was posted today as `post_id`.
///
/// The record's id is the word's id, so recording the same word again
/// overwrites the earlier record (keeping its `date_entry`) instead of adding
/// a second one. After writing, the record is read back through the primary
/// key and through the date index; any disagreement is reported, not repaired.
pub async fn record_tweet(
    store: &dyn BaseWordStore,
    word: &UnprocessedWord,
    today: NaiveDate,
    post_id: &str,
) -> Result<Tweet, RecordError> {
    let existing = store.find_tweet(word.id).await?;
    let date_entry = match &existing {
        Some(previous) if previous.date == today => previous.date_entry,
        _ => i32::try_from(store.count_tweets_on_date(today).await?)
            .map_err(|e| anyhow::anyhow!("Too many tweets on {}: {}", today, e))?,
    };

    if let Some(previous) = &existing {
        warn!(
            word_id = %word.id,
            previous_tweet_id = %previous.tweet_id,
            tweet_id = post_id,
            "Overwriting existing tweet record"
        );
    }

    let tweet = Tweet {
        id: word.id,
        tweet_id: post_id.to_string(),
        date: today,
        date_entry,
        word: word.characters.clone(),
        pinyin: word.pinyin.clone(),
        created_at: existing.map(|t| t.created_at).unwrap_or_else(Utc::now),
    };

    let stored = store.upsert_tweet(&tweet).await?;
    verify_record(store, &stored).await?;

    info!(
        word_id = %stored.id,
        tweet_id = %stored.tweet_id,
        date = %stored.date,
        date_entry = stored.date_entry,
        "Recorded tweet"
    );
    Ok(stored)
}

async fn verify_record(store: &dyn BaseWordStore, expected: &Tweet) -> Result<(), RecordError> {
    let by_id = store.find_tweet(expected.id).await?;
    if by_id.as_ref() != Some(expected) {
        return Err(RecordError::Inconsistent {
            id: expected.id,
            detail: format!("primary record is {:?}", by_id),
        });
    }

    let on_date = store.find_tweets_on_date(expected.date).await?;
    let indexed: Vec<&Tweet> = on_date.iter().filter(|t| t.id == expected.id).collect();
    match indexed.as_slice() {
        [only] if *only == expected => Ok(()),
        [] => Err(RecordError::Inconsistent {
            id: expected.id,
            detail: format!("missing from date index for {}", expected.date),
        }),
        _ => Err(RecordError::Inconsistent {
            id: expected.id,
            detail: format!(
                "date index for {} holds {} differing entries",
                expected.date,
                indexed.len()
            ),
        }),
    }
}
