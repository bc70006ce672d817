//! Dates the three reference links point at.

use chrono::{Days, Months, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

/// Which earlier tweet a reference link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSlot {
    LastWeek,
    LastMonth,
    Random,
}

impl ReferenceSlot {
    /// Slots in the order their links appear in a tweet
    pub const ALL: [ReferenceSlot; 3] = [
        ReferenceSlot::LastWeek,
        ReferenceSlot::LastMonth,
        ReferenceSlot::Random,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceSlot::LastWeek => "Last Week",
            ReferenceSlot::LastMonth => "Last Month",
            ReferenceSlot::Random => "Random",
        }
    }
}

/// Target dates for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceDates {
    pub last_week: NaiveDate,
    pub last_month: NaiveDate,
    /// None when nothing was tweeted before today
    pub random: Option<NaiveDate>,
}

impl ReferenceDates {
    pub fn get(&self, slot: ReferenceSlot) -> Option<NaiveDate> {
        match slot {
            ReferenceSlot::LastWeek => Some(self.last_week),
            ReferenceSlot::LastMonth => Some(self.last_month),
            ReferenceSlot::Random => self.random,
        }
    }
}

/// Seven days before `today`.
pub fn last_week(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN)
}

/// Same day of the previous month, clamped to that month's last day
/// (March 31 becomes February 28, or 29 in a leap year).
pub fn last_month(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(1))
        .unwrap_or(NaiveDate::MIN)
}

/// Pick a date uniformly among `candidates`, skipping any date in `exclude`.
///
/// `candidates` are the dates with at least one tweet before today. Excluding
/// the week and month targets keeps the random link from repeating one of
/// the other two.
pub fn pick_random_date<R: Rng + ?Sized>(
    candidates: &[NaiveDate],
    exclude: &[NaiveDate],
    rng: &mut R,
) -> Option<NaiveDate> {
    let eligible: Vec<NaiveDate> = candidates
        .iter()
        .copied()
        .filter(|d| !exclude.contains(d))
        .collect();
    eligible.choose(rng).copied()
}

/// All three target dates for `today`. `history` is every date with tweets
/// strictly before today.
pub fn reference_dates<R: Rng + ?Sized>(
    today: NaiveDate,
    history: &[NaiveDate],
    rng: &mut R,
) -> ReferenceDates {
    let last_week = last_week(today);
    let last_month = last_month(today);
    let before_today: Vec<NaiveDate> = history.iter().copied().filter(|d| *d < today).collect();
    let random = pick_random_date(&before_today, &[last_week, last_month], rng);

    ReferenceDates {
        last_week,
        last_month,
        random,
    }
}
