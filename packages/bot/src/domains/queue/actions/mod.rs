//! Queue domain actions - the word selector
//!
//! Selecting a word has no side effects. The word leaves the queue only when
//! the caller commits it after the tweet has been recorded.

mod commit_word;
mod select_next;

pub use commit_word::commit_word;
pub use select_next::{queue_cursor, select_next_word};
