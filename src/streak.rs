use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::date_math::{add_days, CalendarDate};
use crate::models::{StreakResult, TimestampedValue};

/// Distinct calendar days with at least one entry, ascending.
pub fn logged_days(entries: &[TimestampedValue]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = entries
        .iter()
        .map(|e| e.occurred_at.calendar_date())
        .collect();
    days.sort();
    days.dedup();
    days
}

/// Current run of consecutive logged days.
///
/// The run is anchored at the most recent logged day on or before `today`,
/// so a day that has not been logged yet does not zero the streak. Entries
/// dated after `today` are ignored. Several entries on one day count once.
#[tracing::instrument(skip_all, fields(entries = entries.len(), %today))]
pub fn compute_streak(entries: &[TimestampedValue], today: NaiveDate) -> StreakResult {
    let mut days = logged_days(entries);
    days.retain(|d| *d <= today);

    let Some(&anchor) = days.last() else {
        return StreakResult::default();
    };

    let mut streak = 0u32;
    for (i, day) in days.iter().rev().enumerate() {
        if add_days(anchor, -(i as i64)) != Some(*day) {
            trace!(%day, "gap ends streak");
            break;
        }
        streak += 1;
    }

    debug!(streak, %anchor, "computed current streak");
    StreakResult {
        current_streak_days: streak,
    }
}

/// Longest run of consecutive logged days anywhere in the history.
pub fn longest_streak(entries: &[TimestampedValue]) -> u32 {
    let days = logged_days(entries);
    if days.is_empty() {
        return 0;
    }

    let mut best = 1u32;
    let mut run = 1u32;
    for w in days.windows(2) {
        if (w[1] - w[0]).num_days() == 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }
    best
}
