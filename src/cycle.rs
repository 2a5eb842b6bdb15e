//! Menstrual cycle phase calculation.
//!
//! For cycle day `d` (1-indexed), cycle length `L` and period length `P`,
//! bands are checked in this order and the first match wins:
//!
//! | Phase      | Days                               |
//! |------------|------------------------------------|
//! | Menstrual  | `1..=P`                            |
//! | Ovulation  | `L/2 - 1 ..= L/2 + 1` (floor)      |
//! | Luteal     | `L/2 + 2 ..`                       |
//! | Follicular | anything else                      |

use chrono::NaiveDate;
use tracing::debug;

use crate::date_math::{cycle_day_of, days_between};
use crate::error::EngineError;
use crate::models::{CycleConfig, CyclePhaseResult, Phase};

/// Phase for a 1-indexed cycle day.
pub fn phase_for_cycle_day(cycle_day: u32, cycle_length: u32, period_length: u32) -> Phase {
    let mid = cycle_length / 2;
    if (1..=period_length).contains(&cycle_day) {
        Phase::Menstrual
    } else if (mid.saturating_sub(1)..=mid + 1).contains(&cycle_day) {
        Phase::Ovulation
    } else if cycle_day >= mid + 2 {
        Phase::Luteal
    } else {
        Phase::Follicular
    }
}

/// Cycle day of `date` relative to the config's last period start.
pub fn cycle_day_for_date(config: &CycleConfig, date: NaiveDate) -> Result<u32, EngineError> {
    config.validate()?;
    let days_since = days_between(config.last_period_start, date);
    cycle_day_of(days_since, config.cycle_length_days).ok_or(
        EngineError::CycleLengthOutOfRange {
            days: config.cycle_length_days,
        },
    )
}

/// Phase of any date, past or future. Shares its boundaries with [`compute_phase`].
pub fn phase_for_date(config: &CycleConfig, date: NaiveDate) -> Result<Phase, EngineError> {
    let day = cycle_day_for_date(config, date)?;
    Ok(phase_for_cycle_day(
        day,
        config.cycle_length_days,
        config.period_length_days,
    ))
}

/// Where `as_of` falls in the cycle.
///
/// `days_until_next_period` is `L - (days since start mod L)`, which is `L`
/// (not 0) on the first day of a period.
#[tracing::instrument(skip_all, fields(%as_of))]
pub fn compute_phase(config: &CycleConfig, as_of: NaiveDate) -> Result<CyclePhaseResult, EngineError> {
    let cycle_length = config.cycle_length_days;
    let current_cycle_day = cycle_day_for_date(config, as_of)?;
    let current_phase =
        phase_for_cycle_day(current_cycle_day, cycle_length, config.period_length_days);

    // L - (days since start mod L); the cycle day is that offset plus one
    let days_until_next_period = cycle_length.saturating_sub(current_cycle_day - 1);

    debug!(
        cycle_day = current_cycle_day,
        phase = current_phase.label(),
        days_until_next_period,
        "computed cycle phase"
    );

    Ok(CyclePhaseResult {
        current_cycle_day,
        current_phase,
        days_until_next_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_math::add_days;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn config(cycle: u32, period: u32) -> CycleConfig {
        CycleConfig::new(date("2026-01-01"), cycle, period).unwrap()
    }

    fn phase_on_day(config: &CycleConfig, day: u32) -> Phase {
        let date = add_days(config.last_period_start, i64::from(day) - 1).unwrap();
        phase_for_date(config, date).unwrap()
    }

    #[test]
    fn standard_28_day_cycle() {
        let c = config(28, 5);
        assert_eq!(phase_on_day(&c, 1), Phase::Menstrual);
        assert_eq!(phase_on_day(&c, 5), Phase::Menstrual);
        assert_eq!(phase_on_day(&c, 6), Phase::Follicular);
        assert_eq!(phase_on_day(&c, 12), Phase::Follicular);
        assert_eq!(phase_on_day(&c, 13), Phase::Ovulation);
        assert_eq!(phase_on_day(&c, 14), Phase::Ovulation);
        assert_eq!(phase_on_day(&c, 15), Phase::Ovulation);
        assert_eq!(phase_on_day(&c, 16), Phase::Luteal);
        assert_eq!(phase_on_day(&c, 28), Phase::Luteal);
    }

    #[test]
    fn menstrual_wins_over_ovulation_when_bands_overlap() {
        // L = 21 -> ovulation band 9..=11; P = 8 stays clear of it.
        assert_eq!(phase_for_cycle_day(9, 21, 8), Phase::Ovulation);
        // Synthetic overlap: P reaches into the ovulation band.
        assert_eq!(phase_for_cycle_day(10, 21, 10), Phase::Menstrual);
        assert_eq!(phase_for_cycle_day(11, 21, 10), Phase::Ovulation);
    }

    #[test]
    fn odd_cycle_length_uses_floor() {
        // L = 35 -> mid 17, ovulation 16..=18, luteal from 19
        assert_eq!(phase_for_cycle_day(15, 35, 5), Phase::Follicular);
        assert_eq!(phase_for_cycle_day(16, 35, 5), Phase::Ovulation);
        assert_eq!(phase_for_cycle_day(18, 35, 5), Phase::Ovulation);
        assert_eq!(phase_for_cycle_day(19, 35, 5), Phase::Luteal);
    }

    #[test]
    fn compute_phase_on_start_day() {
        let c = config(28, 5);
        let r = compute_phase(&c, date("2026-01-01")).unwrap();
        assert_eq!(r.current_cycle_day, 1);
        assert_eq!(r.current_phase, Phase::Menstrual);
        assert_eq!(r.days_until_next_period, 28);
    }

    #[test]
    fn compute_phase_late_in_cycle() {
        let c = config(28, 5);
        let r = compute_phase(&c, date("2026-01-28")).unwrap();
        assert_eq!(r.current_cycle_day, 28);
        assert_eq!(r.current_phase, Phase::Luteal);
        assert_eq!(r.days_until_next_period, 1);
    }

    #[test]
    fn compute_phase_wraps_into_later_cycles() {
        let c = config(28, 5);
        // 2026-02-01 is 31 days after start -> day 4 of the second cycle
        let r = compute_phase(&c, date("2026-02-01")).unwrap();
        assert_eq!(r.current_cycle_day, 4);
        assert_eq!(r.current_phase, Phase::Menstrual);
        assert_eq!(r.days_until_next_period, 25);
    }

    #[test]
    fn dates_before_the_anchor_are_periodic() {
        let c = config(28, 5);
        // one day before start is the last day of the previous cycle
        let r = compute_phase(&c, date("2025-12-31")).unwrap();
        assert_eq!(r.current_cycle_day, 28);
        assert_eq!(r.current_phase, Phase::Luteal);
        assert_eq!(r.days_until_next_period, 1);
    }

    #[test]
    fn far_future_dates_are_fine() {
        let c = config(30, 4);
        let far = add_days(c.last_period_start, 30 * 1000 + 2).unwrap();
        let r = compute_phase(&c, far).unwrap();
        assert_eq!(r.current_cycle_day, 3);
        assert_eq!(r.current_phase, Phase::Menstrual);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let c = CycleConfig {
            last_period_start: date("2026-01-01"),
            cycle_length_days: 40,
            period_length_days: 5,
        };
        assert_eq!(
            compute_phase(&c, date("2026-01-05")),
            Err(EngineError::CycleLengthOutOfRange { days: 40 })
        );
        assert!(phase_for_date(&c, date("2026-01-05")).is_err());
    }

    #[test]
    fn phase_for_date_matches_compute_phase() {
        let c = config(26, 6);
        for offset in -60..60 {
            let d = add_days(c.last_period_start, offset).unwrap();
            assert_eq!(
                phase_for_date(&c, d).unwrap(),
                compute_phase(&c, d).unwrap().current_phase
            );
        }
    }
}
