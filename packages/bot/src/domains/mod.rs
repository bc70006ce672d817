pub mod queue;
pub mod runs;
pub mod tweets;
