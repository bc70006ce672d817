//! One bot run: select a word, resolve its reference links, tweet it, record
//! the tweet, and commit the word, retrying without ever tweeting twice.

pub mod error;
pub mod orchestrator;
pub mod retry;
pub mod state;

pub use error::{RunError, RunFailure};
pub use orchestrator::{local_date, RunContext, RunOrchestrator};
pub use retry::RunReport;
pub use state::RunState;
