//! Run orchestrator.
//!
//! ```text
//! Start ──select──► Selected ──resolve──► ReferencesResolved ──publish──► Posted
//!                                                                          │
//!                                 Done ◄──commit── Recorded ◄──record──────┘
//! ```
//!
//! Every step stores its result in the [`RunContext`] before the state moves
//! on. A retried attempt resumes from the state reached, so the word is never
//! re-selected, the random reference date is never re-rolled, and nothing is
//! posted again once the tweet is out.
//!
//! A selected word that already has a tweet record was posted by an earlier
//! invocation; the run goes straight to `Recorded` and only commits it.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::error::{RunError, RunFailure};
use super::state::RunState;
use crate::config::RunSettings;
use crate::domains::queue::actions::{commit_word, select_next_word};
use crate::domains::queue::models::UnprocessedWord;
use crate::domains::tweets::actions::{
    choose_reference_dates, record_tweet, resolve_references, RecordError, ResolvedReferences,
};
use crate::domains::tweets::body::{compose_post, PostMessage, ReferenceLink};
use crate::domains::tweets::models::Tweet;
use crate::domains::tweets::reference_dates::ReferenceSlot;
use crate::kernel::BotDeps;

/// Everything a run has done so far; held across retry attempts.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub today: NaiveDate,
    /// Seed for the random reference date
    pub seed: u64,
    pub state: RunState,
    pub word: Option<UnprocessedWord>,
    pub references: Option<ResolvedReferences>,
    pub message: Option<PostMessage>,
    pub tweet_id: Option<String>,
    pub tweet: Option<Tweet>,
}

impl RunContext {
    pub fn new(today: NaiveDate, seed: u64) -> Self {
        Self {
            today,
            seed,
            state: RunState::Start,
            word: None,
            references: None,
            message: None,
            tweet_id: None,
            tweet: None,
        }
    }

    /// Context for a run today with a fresh random seed. "Today" is the
    /// calendar date at `offset`, so the daily limit and the reference dates
    /// roll over at that zone's midnight.
    pub fn for_today(offset: FixedOffset) -> Self {
        Self::new(local_date(Utc::now(), offset), rand::random())
    }

    fn fail(&self, failure: RunFailure) -> RunError {
        RunError {
            failure,
            state: self.state,
            word_id: self.word.as_ref().map(|w| w.id),
            tweet_id: self.tweet_id.clone(),
        }
    }

    fn advance(&mut self, to: RunState) {
        debug_assert_eq!(self.state.next(), Some(to));
        debug!(from = %self.state, to = %to, "Run state transition");
        self.state = to;
    }

    fn skip_to(&mut self, to: RunState) {
        debug!(from = %self.state, to = %to, "Run state skip");
        self.state = to;
    }

    fn selected_word(&self) -> Result<UnprocessedWord, RunError> {
        self.word
            .clone()
            .ok_or_else(|| self.fail(RunFailure::MissingContext("selected word")))
    }
}

/// Calendar date of `now` at the given UTC offset
pub fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Runs the select → resolve → post → record → commit cycle
pub struct RunOrchestrator {
    deps: BotDeps,
    settings: RunSettings,
}

impl RunOrchestrator {
    pub fn new(deps: BotDeps, settings: RunSettings) -> Self {
        Self { deps, settings }
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Drive `ctx` to `Done`, starting from whatever state it has reached.
    pub async fn attempt(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        while ctx.state != RunState::Done {
            match ctx.state {
                RunState::Start => self.select(ctx).await?,
                RunState::Selected => self.resolve(ctx).await?,
                RunState::ReferencesResolved => self.post(ctx).await?,
                RunState::Posted => self.record(ctx).await?,
                RunState::Recorded => self.commit(ctx).await?,
                RunState::Done => {}
            }
        }
        Ok(())
    }

    async fn select(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let store = self.deps.store.as_ref();

        let word = select_next_word(store)
            .await
            .map_err(|e| ctx.fail(RunFailure::Store(e)))?
            .ok_or_else(|| ctx.fail(RunFailure::QueueExhausted))?;

        // Recorded by an invocation whose commit never went through.
        let recorded = store
            .find_tweet(word.id)
            .await
            .map_err(|e| ctx.fail(RunFailure::Store(e)))?;
        if let Some(tweet) = recorded {
            warn!(
                word_id = %word.id,
                tweet_id = %tweet.tweet_id,
                date = %tweet.date,
                "Word already tweeted, committing without posting"
            );
            ctx.word = Some(word);
            ctx.tweet_id = Some(tweet.tweet_id.clone());
            ctx.tweet = Some(tweet);
            ctx.skip_to(RunState::Recorded);
            return Ok(());
        }

        let count = store
            .count_tweets_on_date(ctx.today)
            .await
            .map_err(|e| ctx.fail(RunFailure::Store(e)))?;
        if count >= self.settings.tweets_per_day {
            return Err(ctx.fail(RunFailure::DailyLimitReached {
                count,
                limit: self.settings.tweets_per_day,
            }));
        }

        info!(
            word_id = %word.id,
            characters = %word.characters,
            insertion_timestamp = word.insertion_timestamp,
            "Selected word"
        );
        ctx.word = Some(word);
        ctx.advance(RunState::Selected);
        Ok(())
    }

    async fn resolve(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let store = self.deps.store.as_ref();

        let dates = choose_reference_dates(store, ctx.today, ctx.seed)
            .await
            .map_err(|e| ctx.fail(RunFailure::Store(e)))?;
        let mut references = resolve_references(store, dates)
            .await
            .map_err(|e| ctx.fail(RunFailure::Store(e)))?;

        // Links to tweets that were deleted on the platform are left out.
        for slot in ReferenceSlot::ALL {
            let Some(tweet_id) = references.get(slot).map(|t| t.tweet_id.clone()) else {
                continue;
            };
            match self.deps.publisher.post_exists(&tweet_id).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(slot = slot.label(), %tweet_id, "Referenced tweet no longer exists");
                    references.clear(slot);
                }
                Err(e) => {
                    warn!(
                        slot = slot.label(),
                        %tweet_id,
                        error = %e,
                        "Could not check referenced tweet, keeping link"
                    );
                }
            }
        }

        info!(
            last_week = references.last_week.is_some(),
            last_month = references.last_month.is_some(),
            random = references.random.is_some(),
            random_date = ?references.dates.random,
            "Resolved references"
        );
        ctx.references = Some(references);
        ctx.advance(RunState::ReferencesResolved);
        Ok(())
    }

    async fn post(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let word = ctx.selected_word()?;
        let publisher = self.deps.publisher.as_ref();

        let links: Vec<ReferenceLink> = ctx
            .references
            .as_ref()
            .map(|refs| {
                refs.found()
                    .map(|(slot, tweet)| ReferenceLink {
                        slot,
                        word: tweet.word.clone(),
                        tweet_id: tweet.tweet_id.clone(),
                        url: publisher.post_url(&tweet.tweet_id),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let message = compose_post(&word, &links).map_err(|e| ctx.fail(e.into()))?;
        let tweet_id = publisher
            .publish(&message)
            .await
            .map_err(|e| ctx.fail(RunFailure::Publish(e)))?;

        info!(
            word_id = %word.id,
            %tweet_id,
            links = message.links.len(),
            "Posted tweet"
        );
        ctx.message = Some(message);
        ctx.tweet_id = Some(tweet_id);
        ctx.advance(RunState::Posted);
        Ok(())
    }

    async fn record(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let word = ctx.selected_word()?;
        let tweet_id = ctx
            .tweet_id
            .clone()
            .ok_or_else(|| ctx.fail(RunFailure::MissingContext("tweet id")))?;

        let tweet = record_tweet(self.deps.store.as_ref(), &word, ctx.today, &tweet_id)
            .await
            .map_err(|e| {
                ctx.fail(match e {
                    RecordError::Store(e) => RunFailure::Store(e),
                    RecordError::Inconsistent { id, detail } => {
                        RunFailure::InconsistentRecord { id, detail }
                    }
                })
            })?;

        ctx.tweet = Some(tweet);
        ctx.advance(RunState::Recorded);
        Ok(())
    }

    async fn commit(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let word = ctx.selected_word()?;
        commit_word(self.deps.store.as_ref(), &word)
            .await
            .map_err(|e| ctx.fail(RunFailure::Store(e)))?;

        ctx.advance(RunState::Done);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn today_follows_the_configured_offset() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 22, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();

        assert_eq!(local_date(now, utc), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(local_date(now, shanghai), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(local_date(now, new_york), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }
}
