use chrono::NaiveDate;

use crate::models::{MoodSummary, TimestampedValue};
use crate::streak::{compute_streak, logged_days, longest_streak};
use crate::trend::round1;

/// Totals and extremes for the mood history page, plus both streaks.
pub fn summarize(entries: &[TimestampedValue], today: NaiveDate) -> MoodSummary {
    let values: Vec<f64> = entries
        .iter()
        .map(|e| e.value)
        .filter(|v| v.is_finite())
        .collect();

    let average = if values.is_empty() {
        None
    } else {
        Some(round1(values.iter().sum::<f64>() / values.len() as f64))
    };

    MoodSummary {
        entry_count: entries.len(),
        logged_days: logged_days(entries).len(),
        average,
        highest: values.iter().copied().reduce(f64::max),
        lowest: values.iter().copied().reduce(f64::min),
        current_streak_days: compute_streak(entries, today).current_streak_days,
        longest_streak_days: longest_streak(entries),
    }
}
