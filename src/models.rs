use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

pub const MIN_CYCLE_LENGTH: u32 = 21;
pub const MAX_CYCLE_LENGTH: u32 = 35;
pub const MIN_PERIOD_LENGTH: u32 = 3;
pub const MAX_PERIOD_LENGTH: u32 = 8;

/// One mood sample. `value` is on whatever scale the caller uses (the app uses 1-10).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampedValue {
    pub value: f64,
    pub occurred_at: NaiveDateTime,
}

impl TimestampedValue {
    pub fn new(value: f64, occurred_at: NaiveDateTime) -> Self {
        Self { value, occurred_at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreakResult {
    pub current_streak_days: u32,
}

/// Second-half mean minus first-half mean for each window, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TrendResult {
    pub overall_delta: f64,
    pub weekly_delta: f64,
    pub daily_delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub last_period_start: NaiveDate,
    pub cycle_length_days: u32,
    pub period_length_days: u32,
}

impl CycleConfig {
    /// Build a validated config.
    pub fn new(
        last_period_start: NaiveDate,
        cycle_length_days: u32,
        period_length_days: u32,
    ) -> Result<Self, EngineError> {
        let config = Self {
            last_period_start,
            cycle_length_days,
            period_length_days,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range lengths. Values are never clamped.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&self.cycle_length_days) {
            return Err(EngineError::CycleLengthOutOfRange {
                days: self.cycle_length_days,
            });
        }
        if !(MIN_PERIOD_LENGTH..=MAX_PERIOD_LENGTH).contains(&self.period_length_days) {
            return Err(EngineError::PeriodLengthOutOfRange {
                days: self.period_length_days,
            });
        }
        if self.period_length_days >= self.cycle_length_days {
            return Err(EngineError::PeriodNotShorterThanCycle {
                period: self.period_length_days,
                cycle: self.cycle_length_days,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Menstrual => "Menstrual",
            Phase::Follicular => "Follicular",
            Phase::Ovulation => "Ovulation",
            Phase::Luteal => "Luteal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePhaseResult {
    pub current_cycle_day: u32,
    pub current_phase: Phase,
    pub days_until_next_period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
}

/// A logged period. `end_date` is `None` while the period is still ongoing.
/// The id is derived from `start_date`, so rebuilding the same history yields the same ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_start: NaiveDate,
    pub predicted_end: NaiveDate,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilityWindow {
    pub fertile_start: NaiveDate,
    pub fertile_end: NaiveDate,
    pub ovulation_day: NaiveDate,
    pub peak_start: NaiveDate,
    pub peak_end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CycleStats {
    pub total_cycles: usize,
    pub avg_cycle_length: Option<f32>,
    pub avg_period_length: Option<f32>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

/// Aggregates shown on the mood history page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MoodSummary {
    pub entry_count: usize,
    pub logged_days: usize,
    pub average: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub entry_count: usize,
    pub average_value: Option<f64>,
    pub phase: Option<Phase>,
}

/// Data returned to the calendar page for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month0: u32,
    pub cells: Vec<MonthCell>,
}

/// A daily weather reading (temperature, humidity, ...) supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherCorrelation {
    pub coefficient: f64,
    pub paired_days: usize,
}
