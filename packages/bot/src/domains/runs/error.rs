use thiserror::Error;
use uuid::Uuid;

use super::state::RunState;
use crate::domains::tweets::body::BodyError;
use crate::kernel::PublishError;

/// Why a run stopped
#[derive(Debug, Error)]
pub enum RunFailure {
    /// Nothing left to tweet; the queue needs refilling
    #[error("no unprocessed words remain")]
    QueueExhausted,

    #[error("already tweeted {count} of {limit} words today")]
    DailyLimitReached { count: i64, limit: i64 },

    #[error("store error: {0:#}")]
    Store(anyhow::Error),

    #[error(transparent)]
    Publish(PublishError),

    #[error("could not compose tweet: {0}")]
    Message(#[from] BodyError),

    #[error("tweet record {id} is inconsistent: {detail}")]
    InconsistentRecord { id: Uuid, detail: String },

    #[error("run context has no {0}")]
    MissingContext(&'static str),
}

impl RunFailure {
    /// Transient store and publish errors are retried; everything else stops
    /// the run.
    pub fn is_retryable(&self) -> bool {
        match self {
            RunFailure::Store(_) => true,
            RunFailure::Publish(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Expected terminal conditions rather than faults
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            RunFailure::QueueExhausted | RunFailure::DailyLimitReached { .. }
        )
    }
}

/// A failed run with enough context to tell whether a tweet went out without
/// being recorded.
#[derive(Debug, Error)]
#[error("run failed at state '{state}' (word {word_id:?}, tweet {tweet_id:?}): {failure}")]
pub struct RunError {
    #[source]
    pub failure: RunFailure,
    pub state: RunState,
    pub word_id: Option<Uuid>,
    pub tweet_id: Option<String>,
}

impl RunError {
    /// Tweet is public but bookkeeping may be incomplete
    pub fn posted_unrecorded(&self) -> bool {
        self.state == RunState::Posted
    }
}
