//! Which day may be played right now.
//!
//! Everything here is a pure function of the stored progress and the current
//! time. Callers re-evaluate on every tick, so a "come back tomorrow" answer
//! turns into a playable day as soon as the local date rolls over.

use chrono::{DateTime, TimeZone};

use crate::model::{DayIndex, Progress};
use crate::rules::ChallengeRules;
use crate::time::same_calendar_day;

/// Result of resolving the next playable day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Playable(DayIndex),
    Locked,
    WaitForTomorrow,
    AllComplete,
}

impl Availability {
    #[must_use]
    pub fn playable_day(&self) -> Option<DayIndex> {
        match self {
            Availability::Playable(day) => Some(*day),
            Availability::Locked | Availability::WaitForTomorrow | Availability::AllComplete => {
                None
            }
        }
    }

    #[must_use]
    pub fn allows(&self, day: DayIndex) -> bool {
        self.playable_day() == Some(day)
    }
}

/// Status of a single day tile on the challenge board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Completed,
    Available,
    Locked,
    WaitForTomorrow,
}

impl DayStatus {
    #[must_use]
    pub fn is_playable(&self) -> bool {
        matches!(self, DayStatus::Available)
    }
}

/// Find the first unfinished day and decide whether it can be played now.
#[must_use]
pub fn resolve_next_day<Tz: TimeZone>(
    progress: &Progress,
    rules: &ChallengeRules,
    now: &DateTime<Tz>,
) -> Availability {
    let Some(day) = (0..rules.days_count())
        .map(DayIndex::new)
        .find(|day| !progress.is_completed(*day))
    else {
        return Availability::AllComplete;
    };

    match unlock_status(progress, day, now) {
        DayStatus::Available => Availability::Playable(day),
        DayStatus::WaitForTomorrow => Availability::WaitForTomorrow,
        DayStatus::Locked | DayStatus::Completed => Availability::Locked,
    }
}

/// Status of `day` for the board, independent of which day is next.
#[must_use]
pub fn day_status<Tz: TimeZone>(progress: &Progress, day: DayIndex, now: &DateTime<Tz>) -> DayStatus {
    if progress.is_completed(day) {
        return DayStatus::Completed;
    }
    unlock_status(progress, day, now)
}

/// Status of every day in the challenge, in order.
#[must_use]
pub fn board<Tz: TimeZone>(
    progress: &Progress,
    rules: &ChallengeRules,
    now: &DateTime<Tz>,
) -> Vec<(DayIndex, DayStatus)> {
    (0..rules.days_count())
        .map(DayIndex::new)
        .map(|day| (day, day_status(progress, day, now)))
        .collect()
}

fn unlock_status<Tz: TimeZone>(progress: &Progress, day: DayIndex, now: &DateTime<Tz>) -> DayStatus {
    let Some(previous) = day.previous() else {
        return DayStatus::Available;
    };
    let Some(previous) = progress.get(previous).filter(|record| record.completed) else {
        return DayStatus::Locked;
    };
    if same_calendar_day(previous.completed_at, now) {
        DayStatus::WaitForTomorrow
    } else {
        DayStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayRecord, Player};
    use crate::time::fixed_now;
    use chrono::{Duration, Utc};

    fn completed(day: usize, at: DateTime<Utc>) -> DayRecord {
        DayRecord::from_players(DayIndex::new(day), &[Player::solo()], at)
    }

    #[test]
    fn empty_progress_starts_at_day_zero() {
        let rules = ChallengeRules::default();
        assert_eq!(
            resolve_next_day(&Progress::new(), &rules, &fixed_now()),
            Availability::Playable(DayIndex::new(0))
        );
    }

    #[test]
    fn completed_today_waits_for_tomorrow() {
        let rules = ChallengeRules::default();
        let mut progress = Progress::new();
        progress.insert(completed(0, fixed_now()));

        assert_eq!(
            resolve_next_day(&progress, &rules, &fixed_now()),
            Availability::WaitForTomorrow
        );
    }

    #[test]
    fn completed_yesterday_unlocks_next_day() {
        let rules = ChallengeRules::default();
        let mut progress = Progress::new();
        progress.insert(completed(0, fixed_now() - Duration::days(1)));

        assert_eq!(
            resolve_next_day(&progress, &rules, &fixed_now()),
            Availability::Playable(DayIndex::new(1))
        );
    }

    #[test]
    fn wait_clears_when_date_rolls_over() {
        let rules = ChallengeRules::default();
        let mut progress = Progress::new();
        progress.insert(completed(0, fixed_now()));

        // fixed_now is 22:13 UTC; two hours later is the next UTC date.
        let later = fixed_now() + Duration::hours(2);
        assert_eq!(
            resolve_next_day(&progress, &rules, &later),
            Availability::Playable(DayIndex::new(1))
        );
    }

    #[test]
    fn gap_in_progress_is_locked() {
        let rules = ChallengeRules::default();
        let mut progress = Progress::new();
        progress.insert(completed(1, fixed_now() - Duration::days(3)));

        assert_eq!(
            resolve_next_day(&progress, &rules, &fixed_now()),
            Availability::Playable(DayIndex::new(0))
        );
        assert_eq!(
            day_status(&progress, DayIndex::new(2), &fixed_now()),
            DayStatus::Available
        );
        assert_eq!(
            day_status(&progress, DayIndex::new(3), &fixed_now()),
            DayStatus::Locked
        );
    }

    #[test]
    fn incomplete_record_does_not_unlock() {
        let rules = ChallengeRules::default();
        let mut progress = Progress::new();
        let mut first = completed(0, fixed_now() - Duration::days(2));
        first.completed = false;
        progress.insert(first);

        assert_eq!(
            resolve_next_day(&progress, &rules, &fixed_now()),
            Availability::Playable(DayIndex::new(0))
        );
        assert_eq!(
            day_status(&progress, DayIndex::new(1), &fixed_now()),
            DayStatus::Locked
        );
    }

    #[test]
    fn all_days_completed() {
        let rules = ChallengeRules::new(3, 12, 20, 3).unwrap();
        let mut progress = Progress::new();
        for day in 0..3 {
            progress.insert(completed(day, fixed_now() - Duration::days(10 - day as i64)));
        }
        assert_eq!(
            resolve_next_day(&progress, &rules, &fixed_now()),
            Availability::AllComplete
        );
    }

    #[test]
    fn board_reports_every_day() {
        let rules = ChallengeRules::default();
        let mut progress = Progress::new();
        progress.insert(completed(0, fixed_now()));

        let tiles = board(&progress, &rules, &fixed_now());
        assert_eq!(tiles.len(), rules.days_count());
        assert_eq!(tiles[0].1, DayStatus::Completed);
        assert_eq!(tiles[1].1, DayStatus::WaitForTomorrow);
        assert_eq!(tiles[2].1, DayStatus::Locked);
    }

    #[test]
    fn availability_allows_only_resolved_day() {
        let available = Availability::Playable(DayIndex::new(3));
        assert!(available.allows(DayIndex::new(3)));
        assert!(!available.allows(DayIndex::new(4)));
        assert!(!Availability::Locked.allows(DayIndex::new(0)));
    }
}
