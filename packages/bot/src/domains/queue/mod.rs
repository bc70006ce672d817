//! Queue of words waiting to be tweeted, and the cursor that tracks progress
//! through it.

pub mod actions;
pub mod models;

pub use actions::*;
pub use models::*;
