//! Bounded retries around the orchestrator.

use tracing::{error, info, warn};

use super::error::RunError;
use super::orchestrator::{RunContext, RunOrchestrator};
use super::state::RunState;
use crate::domains::tweets::models::Tweet;

/// Outcome of one invocation, after retries
#[derive(Debug)]
pub struct RunReport {
    pub attempts: u32,
    pub state: RunState,
    pub tweet: Option<Tweet>,
    pub error: Option<RunError>,
    /// Pass back to `run_with_retries` to resume a failed run
    pub context: RunContext,
}

impl RunReport {
    fn new(attempts: u32, context: RunContext, error: Option<RunError>) -> Self {
        Self {
            attempts,
            state: context.state,
            tweet: context.tweet.clone(),
            error,
            context,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.state == RunState::Done
    }

    pub fn is_queue_exhausted(&self) -> bool {
        matches!(
            self.error.as_ref().map(|e| &e.failure),
            Some(super::RunFailure::QueueExhausted)
        )
    }
}

impl RunOrchestrator {
    /// The bot's entry point: one run for today, retried on transient errors.
    pub async fn run_once(&self) -> RunReport {
        self.run_with_retries(RunContext::for_today(self.settings().utc_offset))
            .await
    }

    /// Attempt `ctx` up to `max_attempts` times. The same context is reused,
    /// so later attempts pick up where the failed one stopped.
    pub async fn run_with_retries(&self, mut ctx: RunContext) -> RunReport {
        let max_attempts = self.settings().max_attempts.max(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.attempt(&mut ctx).await {
                Ok(()) => {
                    info!(
                        attempts,
                        word_id = ?ctx.word.as_ref().map(|w| w.id),
                        tweet_id = ?ctx.tweet_id,
                        "Run complete"
                    );
                    return RunReport::new(attempts, ctx, None);
                }
                Err(err) if err.failure.is_expected() => {
                    warn!(error = %err, "Run stopped");
                    return RunReport::new(attempts, ctx, Some(err));
                }
                Err(err) if err.failure.is_retryable() && attempts < max_attempts => {
                    warn!(
                        attempt = attempts,
                        max_attempts,
                        state = %err.state,
                        error = %err,
                        "Run attempt failed, retrying"
                    );
                    let delay = self.settings().retry_delay;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(err) => {
                    error!(
                        attempts,
                        state = %err.state,
                        posted = err.state.is_posted(),
                        posted_unrecorded = err.posted_unrecorded(),
                        error = %err,
                        "Run failed"
                    );
                    return RunReport::new(attempts, ctx, Some(err));
                }
            }
        }
    }
}
