//! Commit word action

use anyhow::{Context, Result};
use tracing::info;

use crate::domains::queue::models::{Setting, UnprocessedWord, QUEUE_CURSOR};
use crate::kernel::BaseWordStore;

/// Mark `word` as consumed: move the cursor up to its insertion timestamp and
/// remove it from the queue.
///
/// Safe to repeat. The cursor never moves backwards and deleting a word that
/// is already gone succeeds, so a second commit changes nothing.
pub async fn commit_word(store: &dyn BaseWordStore, word: &UnprocessedWord) -> Result<Setting> {
    let cursor = store
        .advance_setting(QUEUE_CURSOR, word.insertion_timestamp)
        .await
        .with_context(|| format!("Failed to advance queue cursor for word {}", word.id))?;

    store
        .delete_word(word.id)
        .await
        .with_context(|| format!("Failed to delete word {} from queue", word.id))?;

    info!(
        word_id = %word.id,
        cursor = cursor.value,
        "Committed word"
    );
    Ok(cursor)
}
