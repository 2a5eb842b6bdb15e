//! Period history: grouping logged flow days into periods, averaging their
//! lengths, and projecting the next period and fertile window from a
//! [`CycleConfig`].

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::date_math::{add_days, days_between};
use crate::error::EngineError;
use crate::models::{Cycle, CycleConfig, CycleStats, FertilityWindow, Prediction};
use crate::settings::EngineSettings;
use crate::trend::mean;

/// Flow days at most this far apart belong to the same period.
const MAX_FLOW_GAP_DAYS: i64 = 2;
/// Only the most recent periods feed averages used for projection.
const RECENT_PERIODS: usize = 6;
/// Namespace for period ids; the name hashed into it is the ISO start date.
const PERIOD_ID_NAMESPACE: Uuid = Uuid::from_u128(0x3f1c_9a52_7d0e_4b8a_a6c4_52e9_0d17_b3f8);

/// Stable id for the period starting on `start`.
pub fn period_id(start: NaiveDate) -> Uuid {
    Uuid::new_v5(&PERIOD_ID_NAMESPACE, start.to_string().as_bytes())
}

/// Group logged flow days into periods.
///
/// The last period stays open (`end_date == None`) while its latest flow day
/// is within two days of `today`.
pub fn rebuild_cycles(flow_days: &[NaiveDate], today: NaiveDate) -> Vec<Cycle> {
    let mut days = flow_days.to_vec();
    days.sort();
    days.dedup();

    let mut spans: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for day in days {
        match spans.last_mut() {
            Some((_, end)) if days_between(*end, day) <= MAX_FLOW_GAP_DAYS => *end = day,
            _ => spans.push((day, day)),
        }
    }

    let last = spans.len().saturating_sub(1);
    let cycles: Vec<Cycle> = spans
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| {
            let ongoing = i == last && days_between(end, today) <= MAX_FLOW_GAP_DAYS;
            Cycle {
                id: period_id(start),
                start_date: start,
                end_date: (!ongoing).then_some(end),
            }
        })
        .collect();

    debug!(periods = cycles.len(), "rebuilt periods from flow days");
    cycles
}

/// Lengths taken from the most recent periods, ongoing one included.
struct RecentHistory {
    latest_start: NaiveDate,
    /// Days between consecutive period starts.
    gaps: Vec<f64>,
    /// Inclusive lengths of the finished periods.
    period_lengths: Vec<f64>,
}

fn recent_history(cycles: &[Cycle]) -> Option<RecentHistory> {
    let mut by_start: Vec<&Cycle> = cycles.iter().collect();
    by_start.sort_by_key(|c| c.start_date);
    by_start.dedup_by_key(|c| c.start_date);

    let recent = &by_start[by_start.len().saturating_sub(RECENT_PERIODS)..];
    let latest_start = recent.last()?.start_date;

    Some(RecentHistory {
        latest_start,
        gaps: start_gaps(recent).into_iter().map(|g| g as f64).collect(),
        period_lengths: recent.iter().filter_map(|c| period_length(c)).collect(),
    })
}

fn start_gaps(sorted: &[&Cycle]) -> Vec<i64> {
    sorted
        .windows(2)
        .map(|w| days_between(w[0].start_date, w[1].start_date))
        .collect()
}

fn period_length(cycle: &Cycle) -> Option<f64> {
    let end = cycle.end_date?;
    Some((days_between(cycle.start_date, end) + 1) as f64)
}

fn config_from_history(
    history: &RecentHistory,
    settings: &EngineSettings,
) -> Result<CycleConfig, EngineError> {
    let rounded = |values: &[f64]| (!values.is_empty()).then(|| mean(values).round() as u32);
    CycleConfig::new(
        history.latest_start,
        rounded(&history.gaps).unwrap_or(settings.default_cycle_length_days),
        rounded(&history.period_lengths).unwrap_or(settings.default_period_length_days),
    )
}

/// A [`CycleConfig`] anchored at the latest period start, using lengths
/// averaged over recent periods and the settings defaults where history
/// has none.
///
/// Returns `Ok(None)` when there is no period at all. The result is
/// validated, not clamped, so an unusual history surfaces as an error.
pub fn suggest_config(
    cycles: &[Cycle],
    settings: &EngineSettings,
) -> Result<Option<CycleConfig>, EngineError> {
    recent_history(cycles)
        .map(|history| config_from_history(&history, settings))
        .transpose()
}

/// Next period, one averaged cycle after the latest start.
///
/// Needs at least two period starts; an ongoing period counts. Confidence
/// falls as the spacing between starts varies, and is 0.5 with a single gap.
pub fn predict(
    cycles: &[Cycle],
    settings: &EngineSettings,
) -> Result<Option<Prediction>, EngineError> {
    let Some(history) = recent_history(cycles).filter(|h| !h.gaps.is_empty()) else {
        return Ok(None);
    };
    let config = config_from_history(&history, settings)?;

    let predicted_start = add_days(
        config.last_period_start,
        i64::from(config.cycle_length_days),
    )
    .ok_or(EngineError::DateOutOfRange)?;
    let predicted_end = add_days(predicted_start, i64::from(config.period_length_days) - 1)
        .ok_or(EngineError::DateOutOfRange)?;

    let confidence = match history.gaps.len() {
        1 => 0.5,
        _ => {
            let variation = sample_std_dev(&history.gaps) / mean(&history.gaps);
            (1.0 - variation as f32).clamp(0.1, 0.95)
        }
    };

    debug!(%predicted_start, confidence, "predicted next period");
    Ok(Some(Prediction {
        predicted_start,
        predicted_end,
        confidence,
    }))
}

/// Fertile window of the cycle starting at `config.last_period_start`.
///
/// Ovulation is cycle day `floor(L/2)` and the peak covers the ovulation
/// band `floor(L/2) ± 1`, the same days [`crate::phase_for_date`] reports as
/// [`crate::Phase::Ovulation`]. The fertile window opens five days before
/// ovulation and closes with the peak.
pub fn fertility_window(config: &CycleConfig) -> Result<FertilityWindow, EngineError> {
    config.validate()?;
    let mid = i64::from(config.cycle_length_days / 2);
    let cycle_day = |day: i64| {
        add_days(config.last_period_start, day - 1).ok_or(EngineError::DateOutOfRange)
    };

    Ok(FertilityWindow {
        fertile_start: cycle_day(mid - 5)?,
        fertile_end: cycle_day(mid + 1)?,
        ovulation_day: cycle_day(mid)?,
        peak_start: cycle_day(mid - 1)?,
        peak_end: cycle_day(mid + 1)?,
    })
}

/// Totals over finished periods.
pub fn cycle_stats(cycles: &[Cycle]) -> CycleStats {
    let mut finished: Vec<&Cycle> = cycles.iter().filter(|c| c.end_date.is_some()).collect();
    finished.sort_by_key(|c| c.start_date);
    let Some(last) = finished.last() else {
        return CycleStats::default();
    };

    let gaps = start_gaps(&finished);
    let gap_values: Vec<f64> = gaps.iter().map(|&g| g as f64).collect();
    let period_lengths: Vec<f64> = finished.iter().filter_map(|c| period_length(c)).collect();

    CycleStats {
        total_cycles: finished.len(),
        avg_cycle_length: (!gaps.is_empty()).then(|| mean(&gap_values) as f32),
        avg_period_length: (!period_lengths.is_empty()).then(|| mean(&period_lengths) as f32),
        shortest_cycle: gaps.iter().copied().min(),
        longest_cycle: gaps.iter().copied().max(),
        last_period_start: Some(last.start_date),
        last_period_end: last.end_date,
    }
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let squares: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (squares / (values.len() - 1) as f64).sqrt()
}
