//! Resolve reference links action

use anyhow::Result;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::domains::tweets::models::Tweet;
use crate::domains::tweets::reference_dates::{reference_dates, ReferenceDates, ReferenceSlot};
use crate::kernel::BaseWordStore;

/// The earliest tweet posted on exactly `date`, if any.
///
/// There is no search for a nearby date: a date without tweets resolves to
/// None and the caller leaves that link out.
pub async fn resolve_reference(store: &dyn BaseWordStore, date: NaiveDate) -> Result<Option<Tweet>> {
    let tweets = store.find_tweets_on_date(date).await?;
    Ok(tweets
        .into_iter()
        .min_by_key(|t| (t.date_entry, t.created_at)))
}

/// Choose the three target dates for a run on `today`.
///
/// The random date is drawn from the dates that actually have tweets, using
/// `seed`, so the same seed and history always give the same dates.
pub async fn choose_reference_dates(
    store: &dyn BaseWordStore,
    today: NaiveDate,
    seed: u64,
) -> Result<ReferenceDates> {
    let history = store.tweet_dates_before(today).await?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(reference_dates(today, &history, &mut rng))
}

/// Tweets found for each reference slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReferences {
    pub dates: ReferenceDates,
    pub last_week: Option<Tweet>,
    pub last_month: Option<Tweet>,
    pub random: Option<Tweet>,
}

impl ResolvedReferences {
    pub fn get(&self, slot: ReferenceSlot) -> Option<&Tweet> {
        match slot {
            ReferenceSlot::LastWeek => self.last_week.as_ref(),
            ReferenceSlot::LastMonth => self.last_month.as_ref(),
            ReferenceSlot::Random => self.random.as_ref(),
        }
    }

    /// Drop the tweet in `slot`
    pub fn clear(&mut self, slot: ReferenceSlot) {
        match slot {
            ReferenceSlot::LastWeek => self.last_week = None,
            ReferenceSlot::LastMonth => self.last_month = None,
            ReferenceSlot::Random => self.random = None,
        }
    }

    /// Found tweets in link order
    pub fn found(&self) -> impl Iterator<Item = (ReferenceSlot, &Tweet)> {
        ReferenceSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|t| (slot, t)))
    }
}

/// Resolve every slot of `dates`. Slots without a date stay empty.
pub async fn resolve_references(
    store: &dyn BaseWordStore,
    dates: ReferenceDates,
) -> Result<ResolvedReferences> {
    let mut resolved = ResolvedReferences {
        dates,
        last_week: None,
        last_month: None,
        random: None,
    };

    for slot in ReferenceSlot::ALL {
        let Some(date) = dates.get(slot) else {
            debug!(slot = slot.label(), "No date for reference slot");
            continue;
        };
        let tweet = resolve_reference(store, date).await?;
        debug!(
            slot = slot.label(),
            %date,
            found = tweet.is_some(),
            "Resolved reference"
        );
        match slot {
            ReferenceSlot::LastWeek => resolved.last_week = tweet,
            ReferenceSlot::LastMonth => resolved.last_month = tweet,
            ReferenceSlot::Random => resolved.random = tweet,
        }
    }

    Ok(resolved)
}
