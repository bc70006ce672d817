//! Tweet length accounting.
//!
//! Twitter weighs most CJK code points as two characters and shortens every
//! URL to a fixed-length t.co link, so `str::chars().count()` undercounts a
//! Chinese tweet by roughly half.

/// Maximum weighted length of a tweet.
pub const TWEET_MAX_CHARS: usize = 280;

/// Weighted length of any URL after t.co shortening.
pub const TWEET_URL_LENGTH: usize = 23;

/// Code point ranges counted as a single character (twitter-text v3).
const LIGHT_RANGES: [(u32, u32); 4] = [(0, 4351), (8192, 8205), (8208, 8223), (8242, 8247)];

/// Weight of a single character.
pub fn char_weight(c: char) -> usize {
    let cp = c as u32;
    if LIGHT_RANGES
        .iter()
        .any(|&(start, end)| cp >= start && cp <= end)
    {
        1
    } else {
        2
    }
}

/// Weighted length of text that contains no URLs.
pub fn weighted_len(text: &str) -> usize {
    text.chars().map(char_weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_pinyin_weigh_one() {
        assert_eq!(weighted_len("apple"), 5);
        assert_eq!(weighted_len("píngguǒ"), 7);
    }

    #[test]
    fn hanzi_weigh_two() {
        assert_eq!(weighted_len("苹果"), 4);
        assert_eq!(weighted_len("苹果 (píngguǒ)"), 4 + 1 + 9);
    }

    #[test]
    fn fullwidth_punctuation_weighs_two() {
        assert_eq!(weighted_len("，"), 2);
    }
}
