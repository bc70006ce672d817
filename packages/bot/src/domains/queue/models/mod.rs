pub mod setting;
pub mod unprocessed_word;

pub use setting::*;
pub use unprocessed_word::*;
