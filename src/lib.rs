//! Date-driven calculations behind the Melodica wellness tracker.
//!
//! Every function here is pure: callers load mood entries and cycle settings
//! from their own storage, pass the current date or time explicitly, and get
//! fresh values back. Nothing reads the system clock.
//!
//! | Area        | Entry points                                              |
//! |-------------|-----------------------------------------------------------|
//! | Streaks     | [`compute_streak`], [`longest_streak`]                    |
//! | Trends      | [`compute_trend`], [`compute_trend_with`]                 |
//! | Cycle phase | [`compute_phase`], [`phase_for_date`]                     |
//! | Calendar    | [`build_month_grid`], [`month_view`]                      |
//! | Periods     | [`rebuild_cycles`], [`predict`], [`fertility_window`], [`cycle_stats`], [`suggest_config`] |
//! | History     | [`summarize`], [`correlate_with_weather`]                 |
//!
//! ```
//! use chrono::NaiveDate;
//! use melodica_engine::{compute_phase, CycleConfig, Phase};
//!
//! let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let config = CycleConfig::new(start, 28, 5).unwrap();
//! let today = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
//!
//! let phase = compute_phase(&config, today).unwrap();
//! assert_eq!(phase.current_cycle_day, 14);
//! assert_eq!(phase.current_phase, Phase::Ovulation);
//! ```
//!
//! Logging goes through `tracing`; install a subscriber in the host
//! application to see it.

pub mod calendar;
pub mod correlation;
pub mod cycle;
pub mod date_math;
pub mod error;
pub mod models;
pub mod prediction;
pub mod settings;
pub mod streak;
pub mod summary;
pub mod trend;

pub use calendar::{build_month_grid, month_view, GRID_CELLS};
pub use correlation::correlate_with_weather;
pub use cycle::{compute_phase, phase_for_date};
pub use date_math::{cycle_day_of, days_between, same_calendar_day, CalendarDate};
pub use error::EngineError;
pub use models::*;
pub use prediction::{cycle_stats, fertility_window, period_id, predict, rebuild_cycles, suggest_config};
pub use settings::{EngineSettings, TrendWindows, MAX_WINDOW_DAYS};
pub use streak::{compute_streak, longest_streak};
pub use summary::summarize;
pub use trend::{compute_trend, compute_trend_with};
