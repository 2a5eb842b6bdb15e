//! Mood against daily weather readings.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::date_math::CalendarDate;
use crate::models::{TimestampedValue, WeatherCorrelation, WeatherObservation};
use crate::trend::mean;

const MIN_PAIRED_DAYS: usize = 3;

/// Pearson correlation between each day's mean mood and that day's reading.
///
/// Days without both a mood entry and a reading are skipped, as are
/// non-finite values. Returns `None` for fewer than 3 paired days or when
/// either side has no variance. Several readings on one day are averaged.
pub fn correlate_with_weather(
    entries: &[TimestampedValue],
    observations: &[WeatherObservation],
) -> Option<WeatherCorrelation> {
    let mood = daily_means(
        entries
            .iter()
            .map(|e| (e.occurred_at.calendar_date(), e.value)),
    );
    let weather = daily_means(observations.iter().map(|o| (o.date, o.value)));

    let paired: Vec<(f64, f64)> = mood
        .iter()
        .filter_map(|(day, m)| weather.get(day).map(|w| (*m, *w)))
        .collect();
    if paired.len() < MIN_PAIRED_DAYS {
        return None;
    }

    let coefficient = coefficient(&paired)?;
    debug!(coefficient, paired_days = paired.len(), "weather correlation");
    Some(WeatherCorrelation {
        coefficient,
        paired_days: paired.len(),
    })
}

fn daily_means(values: impl Iterator<Item = (NaiveDate, f64)>) -> BTreeMap<NaiveDate, f64> {
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (day, v) in values.filter(|(_, v)| v.is_finite()) {
        by_day.entry(day).or_default().push(v);
    }
    by_day
        .into_iter()
        .map(|(day, values)| (day, mean(&values)))
        .collect()
}

/// Covariance over the product of spreads, for (mood, reading) day pairs.
/// `None` when either side is flat.
fn coefficient(paired: &[(f64, f64)]) -> Option<f64> {
    let (moods, readings): (Vec<f64>, Vec<f64>) = paired.iter().copied().unzip();
    let (mood_mean, reading_mean) = (mean(&moods), mean(&readings));

    let (cov, mood_spread, reading_spread) =
        paired.iter().fold((0.0, 0.0, 0.0), |(cov, ms, rs), (m, r)| {
            let (dm, dr) = (m - mood_mean, r - reading_mean);
            (cov + dm * dr, ms + dm * dm, rs + dr * dr)
        });

    let spread = (mood_spread * reading_spread).sqrt();
    (spread > 0.0).then(|| (cov / spread).clamp(-1.0, 1.0))
}
