pub mod tweet_text;

pub use tweet_text::*;
