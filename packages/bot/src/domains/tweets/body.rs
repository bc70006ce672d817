//! Tweet body composition.
//!
//! Layout:
//!
//! ```text
//! 苹果 (píngguǒ): apple; CL:個|个
//!
//! Last Week: 桌子 (https://twitter.com/bot/status/1)
//! Last Month: 书 (https://twitter.com/bot/status/2)
//! Random: 水 (https://twitter.com/bot/status/3)
//! ```
//!
//! The word and pinyin are mandatory. The first definition that fits comes
//! next, then as many reference lines as fit, then further definitions.

use thiserror::Error;

use super::reference_dates::ReferenceSlot;
use crate::common::utils::{weighted_len, TWEET_MAX_CHARS, TWEET_URL_LENGTH};
use crate::domains::queue::models::UnprocessedWord;

/// A link back to an earlier tweet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLink {
    pub slot: ReferenceSlot,
    pub word: String,
    pub tweet_id: String,
    pub url: String,
}

impl ReferenceLink {
    fn line(&self) -> String {
        format!("\n{}: {} ({})", self.slot.label(), self.word, self.url)
    }

    /// Weighted length of the line once the URL is shortened
    fn weight(&self) -> usize {
        let without_url = format!("\n{}: {} ()", self.slot.label(), self.word);
        weighted_len(&without_url) + TWEET_URL_LENGTH
    }
}

/// A composed tweet and the reference links that made it into the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessage {
    pub text: String,
    pub links: Vec<ReferenceLink>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("'{entry}' weighs {weight} characters, more than the {max} allowed")]
    TooLong {
        entry: String,
        weight: usize,
        max: usize,
    },
}

/// Compose the tweet for `word` with whichever `references` fit.
pub fn compose_post(
    word: &UnprocessedWord,
    references: &[ReferenceLink],
) -> Result<PostMessage, BodyError> {
    let mut head = format!("{} ({})", word.characters, word.pinyin);
    let mut used = weighted_len(&head);
    if used > TWEET_MAX_CHARS {
        return Err(BodyError::TooLong {
            entry: head,
            weight: used,
            max: TWEET_MAX_CHARS,
        });
    }

    let definitions = word.definitions();
    let first = definitions
        .iter()
        .position(|d| used + 2 + weighted_len(d) <= TWEET_MAX_CHARS);
    if let Some(i) = first {
        head.push_str(": ");
        head.push_str(definitions[i]);
        used += 2 + weighted_len(definitions[i]);
    }

    let mut remaining = TWEET_MAX_CHARS - used;

    // Reference lines are separated from the word by a blank line.
    let mut links = Vec::new();
    for slot in ReferenceSlot::ALL {
        let Some(link) = references.iter().find(|l| l.slot == slot) else {
            continue;
        };
        let cost = link.weight() + usize::from(links.is_empty());
        if cost <= remaining {
            remaining -= cost;
            links.push(link.clone());
        }
    }

    let mut has_definition = first.is_some();
    for (i, definition) in definitions.iter().enumerate() {
        if Some(i) == first {
            continue;
        }
        let cost = 2 + weighted_len(definition);
        if cost <= remaining {
            head.push_str(if has_definition { "; " } else { ": " });
            head.push_str(definition);
            remaining -= cost;
            has_definition = true;
        }
    }

    let mut text = head;
    if !links.is_empty() {
        text.push('\n');
        for link in &links {
            text.push_str(&link.line());
        }
    }

    Ok(PostMessage { text, links })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(characters: &str, pinyin: &str, annotation: Option<&str>) -> UnprocessedWord {
        UnprocessedWord {
            id: uuid::Uuid::new_v4(),
            characters: characters.to_string(),
            pinyin: pinyin.to_string(),
            annotation: annotation.map(str::to_string),
            insertion_timestamp: 1,
            created_at: chrono::Utc::now(),
        }
    }

    fn link(slot: ReferenceSlot, word: &str, id: &str) -> ReferenceLink {
        ReferenceLink {
            slot,
            word: word.to_string(),
            tweet_id: id.to_string(),
            url: format!("https://twitter.com/testbot/status/{}", id),
        }
    }

    #[test]
    fn word_only() {
        let msg = compose_post(&word("苹果", "píngguǒ", None), &[]).unwrap();
        assert_eq!(msg.text, "苹果 (píngguǒ)");
        assert!(msg.links.is_empty());
    }

    #[test]
    fn definitions_and_links_in_slot_order() {
        let refs = vec![
            link(ReferenceSlot::Random, "水", "3"),
            link(ReferenceSlot::LastWeek, "桌子", "1"),
        ];
        let msg = compose_post(&word("苹果", "píngguǒ", Some("apple; CL:個|个")), &refs).unwrap();

        assert_eq!(
            msg.text,
            "苹果 (píngguǒ): apple; CL:個|个\n\
             \nLast Week: 桌子 (https://twitter.com/testbot/status/1)\
             \nRandom: 水 (https://twitter.com/testbot/status/3)"
        );
        assert_eq!(msg.links.len(), 2);
        assert_eq!(msg.links[0].slot, ReferenceSlot::LastWeek);
    }

    #[test]
    fn oversized_definition_is_skipped_for_one_that_fits() {
        let long = "x".repeat(300);
        let annotation = format!("{}; short", long);
        let msg = compose_post(&word("书", "shū", Some(&annotation)), &[]).unwrap();
        assert_eq!(msg.text, "书 (shū): short");
    }

    #[test]
    fn links_that_do_not_fit_are_dropped() {
        // Leaves room for the word line but not for a 23-character link.
        let filler = "y".repeat(TWEET_MAX_CHARS - weighted_len("书 (shū): ") - 10);
        let msg = compose_post(
            &word("书", "shū", Some(&filler)),
            &[link(ReferenceSlot::LastWeek, "桌子", "1")],
        )
        .unwrap();
        assert!(msg.links.is_empty());
        assert!(!msg.text.contains("Last Week"));
        assert!(weighted_len(&msg.text) <= TWEET_MAX_CHARS);
    }

    #[test]
    fn word_over_limit_is_an_error() {
        let huge = "字".repeat(141);
        let err = compose_post(&word(&huge, "zì", None), &[]).unwrap_err();
        assert!(matches!(err, BodyError::TooLong { max: 280, .. }));
    }
}
