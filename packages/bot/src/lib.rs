// Mandarin word bot - core
//
// Pops one unseen word from the queue, tweets it with links to the words
// tweeted a week ago, a month ago and on a random earlier day, and records the
// tweet so later runs can link back to it.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
