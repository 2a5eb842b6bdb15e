//! Mean-shift trend deltas.
//!
//! Each window is sorted chronologically, split at `floor(n / 2)`, and
//! reported as the second-half mean minus the first-half mean. Windows are
//! independent of each other. Means are kept at full precision and only the
//! final delta is rounded to one decimal.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::error::EngineError;
use crate::models::{TimestampedValue, TrendResult};
use crate::settings::TrendWindows;

/// Trend deltas using the default 7-day and 1-day windows.
pub fn compute_trend(entries: &[TimestampedValue], now: NaiveDateTime) -> TrendResult {
    trend_for_windows(entries, now, &TrendWindows::default())
}

/// Trend deltas with caller-chosen window lengths.
pub fn compute_trend_with(
    entries: &[TimestampedValue],
    now: NaiveDateTime,
    windows: &TrendWindows,
) -> Result<TrendResult, EngineError> {
    windows.validate()?;
    Ok(trend_for_windows(entries, now, windows))
}

#[tracing::instrument(skip_all, fields(entries = entries.len(), %now))]
fn trend_for_windows(
    entries: &[TimestampedValue],
    now: NaiveDateTime,
    windows: &TrendWindows,
) -> TrendResult {
    let mut sorted: Vec<&TimestampedValue> = entries.iter().collect();
    sorted.sort_by_key(|e| e.occurred_at);

    let all: Vec<f64> = sorted.iter().map(|e| e.value).collect();
    let result = TrendResult {
        overall_delta: round1(half_delta(&all)),
        weekly_delta: round1(half_delta(&window_values(&sorted, now, windows.weekly()))),
        daily_delta: round1(half_delta(&window_values(&sorted, now, windows.daily()))),
    };

    debug!(
        overall = result.overall_delta,
        weekly = result.weekly_delta,
        daily = result.daily_delta,
        "computed trend"
    );
    result
}

/// Values of `sorted` entries inside `[now - span, now]`, in order.
fn window_values(sorted: &[&TimestampedValue], now: NaiveDateTime, span: Duration) -> Vec<f64> {
    let start = now.checked_sub_signed(span).unwrap_or(NaiveDateTime::MIN);
    sorted
        .iter()
        .filter(|e| e.occurred_at >= start && e.occurred_at <= now)
        .map(|e| e.value)
        .collect()
}

/// Second-half mean minus first-half mean. Zero for fewer than two values.
pub fn half_delta(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mid = values.len() / 2;
    mean(&values[mid..]) - mean(&values[..mid])
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn series(start: &str, values: &[f64]) -> Vec<TimestampedValue> {
        let start = at(start);
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TimestampedValue::new(*v, start + Duration::days(i as i64)))
            .collect()
    }

    #[test]
    fn empty_and_single_inputs_are_zero() {
        let now = at("2026-05-10 12:00");
        assert_eq!(compute_trend(&[], now), TrendResult::default());

        let one = [TimestampedValue::new(7.0, at("2026-05-10 09:00"))];
        assert_eq!(compute_trend(&one, now), TrendResult::default());
    }

    #[test]
    fn rising_series_is_positive() {
        let entries = series("2026-04-01 09:00", &[2.0, 2.0, 2.0, 8.0, 8.0, 8.0]);
        let trend = compute_trend(&entries, at("2026-05-10 12:00"));
        assert_eq!(trend.overall_delta, 6.0);
    }

    #[test]
    fn falling_series_is_negative() {
        let entries = series("2026-04-01 09:00", &[8.0, 8.0, 8.0, 2.0, 2.0, 2.0]);
        let trend = compute_trend(&entries, at("2026-05-10 12:00"));
        assert_eq!(trend.overall_delta, -6.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut entries = series("2026-04-01 09:00", &[2.0, 2.0, 2.0, 8.0, 8.0, 8.0]);
        entries.reverse();
        let trend = compute_trend(&entries, at("2026-05-10 12:00"));
        assert_eq!(trend.overall_delta, 6.0);
    }

    #[test]
    fn odd_length_puts_extra_value_in_second_half() {
        // first = [1], second = [4, 7]
        assert_eq!(half_delta(&[1.0, 4.0, 7.0]), 4.5);
    }

    #[test]
    fn rounds_only_at_output() {
        // first mean 1.0, second mean 4/3 -> 0.333.. -> 0.3
        let entries = series("2026-04-01 09:00", &[1.0, 1.0, 1.0, 1.0, 1.0, 2.0]);
        let trend = compute_trend(&entries, at("2026-05-10 12:00"));
        assert_eq!(trend.overall_delta, 0.3);
    }

    #[test]
    fn windows_ignore_older_entries() {
        let now = at("2026-05-10 12:00");
        let mut entries = series("2026-04-01 09:00", &[9.0, 9.0, 9.0]);
        // within the last week: 3, 5
        entries.push(TimestampedValue::new(3.0, at("2026-05-05 09:00")));
        entries.push(TimestampedValue::new(5.0, at("2026-05-06 09:00")));
        // within the last day: 4, 8
        entries.push(TimestampedValue::new(4.0, at("2026-05-09 18:00")));
        entries.push(TimestampedValue::new(8.0, at("2026-05-10 08:00")));

        let trend = compute_trend(&entries, now);
        // week: [3, 5, 4, 8] -> (4+8)/2 - (3+5)/2 = 2
        assert_eq!(trend.weekly_delta, 2.0);
        // day: [4, 8] -> 4
        assert_eq!(trend.daily_delta, 4.0);
    }

    #[test]
    fn window_with_one_entry_is_zero() {
        let now = at("2026-05-10 12:00");
        let entries = [
            TimestampedValue::new(2.0, at("2026-05-01 09:00")),
            TimestampedValue::new(9.0, at("2026-05-10 09:00")),
        ];
        let trend = compute_trend(&entries, now);
        assert_eq!(trend.overall_delta, 7.0);
        assert_eq!(trend.weekly_delta, 0.0);
        assert_eq!(trend.daily_delta, 0.0);
    }

    #[test]
    fn entries_after_now_are_outside_windows() {
        let now = at("2026-05-10 12:00");
        let entries = [
            TimestampedValue::new(2.0, at("2026-05-10 09:00")),
            TimestampedValue::new(9.0, at("2026-05-10 18:00")),
        ];
        assert_eq!(compute_trend(&entries, now).daily_delta, 0.0);
    }

    #[test]
    fn custom_windows() {
        let now = at("2026-05-10 12:00");
        let entries = [
            TimestampedValue::new(2.0, at("2026-04-28 09:00")),
            TimestampedValue::new(6.0, at("2026-05-09 09:00")),
        ];
        let windows = TrendWindows {
            weekly_days: 14,
            daily_days: 1,
        };
        let trend = compute_trend_with(&entries, now, &windows).unwrap();
        assert_eq!(trend.weekly_delta, 4.0);
    }

    #[test]
    fn oversized_window_is_an_error_not_a_panic() {
        let windows = TrendWindows {
            weekly_days: i64::MAX,
            daily_days: 1,
        };
        assert_eq!(
            compute_trend_with(&[], at("2026-05-10 12:00"), &windows),
            Err(EngineError::InvalidWindow {
                name: "weekly",
                days: i64::MAX
            })
        );
    }

    #[test]
    fn longest_window_near_the_earliest_timestamp() {
        let now = NaiveDateTime::MIN + Duration::days(2);
        let entries = [
            TimestampedValue::new(1.0, NaiveDateTime::MIN),
            TimestampedValue::new(3.0, now),
        ];
        let windows = TrendWindows {
            weekly_days: crate::settings::MAX_WINDOW_DAYS,
            daily_days: 1,
        };
        let trend = compute_trend_with(&entries, now, &windows).unwrap();
        assert_eq!(trend.weekly_delta, 2.0);
    }

    #[test]
    fn rejects_non_positive_windows() {
        let windows = TrendWindows {
            weekly_days: 0,
            daily_days: 1,
        };
        assert!(compute_trend_with(&[], at("2026-05-10 12:00"), &windows).is_err());
    }
}
