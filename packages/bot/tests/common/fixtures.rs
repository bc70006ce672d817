//! Test data builders.

use bot_core::domains::queue::models::UnprocessedWord;
use bot_core::domains::tweets::models::Tweet;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// A queued word with the given insertion timestamp
pub fn word(characters: &str, pinyin: &str, insertion_timestamp: i64) -> UnprocessedWord {
    UnprocessedWord::builder()
        .characters(characters)
        .pinyin(pinyin)
        .insertion_timestamp(insertion_timestamp)
        .build()
}

/// `count` distinct words with increasing timestamps
pub fn words(count: usize) -> Vec<UnprocessedWord> {
    (0..count)
        .map(|i| word(&format!("词{}", i), &format!("cí{}", i), (i as i64 + 1) * 10))
        .collect()
}

/// A recorded tweet
pub fn tweet(word: &str, on: NaiveDate, date_entry: i32, tweet_id: &str) -> Tweet {
    Tweet {
        id: Uuid::new_v4(),
        tweet_id: tweet_id.to_string(),
        date: on,
        date_entry,
        word: word.to_string(),
        pinyin: format!("{}-pinyin", word),
        created_at: Utc::now(),
    }
}
