//! Select next word action

use anyhow::Result;
use tracing::debug;

use crate::domains::queue::models::{UnprocessedWord, QUEUE_CURSOR};
use crate::kernel::BaseWordStore;

/// Current cursor value; 0 when the cursor has never been set.
pub async fn queue_cursor(store: &dyn BaseWordStore) -> Result<i64> {
    Ok(store
        .find_setting(QUEUE_CURSOR)
        .await?
        .map(|s| s.value)
        .unwrap_or(0))
}

/// Oldest queued word past the cursor, or None when the queue is exhausted.
///
/// Nothing is removed here; see [`commit_word`](super::commit_word).
pub async fn select_next_word(store: &dyn BaseWordStore) -> Result<Option<UnprocessedWord>> {
    let cursor = queue_cursor(store).await?;
    let word = store.next_word_after(cursor).await?;

    debug!(
        cursor,
        word_id = ?word.as_ref().map(|w| w.id),
        "Selected next word"
    );
    Ok(word)
}
