//! Month grids for the calendar pages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::cycle::phase_for_date;
use crate::date_math::{add_days, days_in_month, first_of_month, weekday_index, CalendarDate};
use crate::error::EngineError;
use crate::models::{CalendarCell, CycleConfig, MonthCell, MonthView, TimestampedValue};

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

/// 42 consecutive days covering the month, starting on the Sunday on or
/// before the 1st. `month0` is `0..=11`.
pub fn build_month_grid(year: i32, month0: u32) -> Result<Vec<CalendarCell>, EngineError> {
    let invalid = || EngineError::InvalidMonth { year, month0 };
    let first = first_of_month(year, month0).ok_or_else(invalid)?;
    let month_len = days_in_month(year, month0).ok_or_else(invalid)?;

    let leading = i64::from(weekday_index(first));
    let grid_start = add_days(first, -leading).ok_or_else(invalid)?;
    let current = leading..leading + i64::from(month_len);

    (0..GRID_CELLS as i64)
        .map(|i| {
            Some(CalendarCell {
                date: add_days(grid_start, i)?,
                is_current_month: current.contains(&i),
            })
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)
}

/// Month grid annotated with logged entries, today's marker and, when a
/// cycle config is given, the phase of each day.
#[tracing::instrument(skip(entries, config), fields(entries = entries.len()))]
pub fn month_view(
    year: i32,
    month0: u32,
    entries: &[TimestampedValue],
    config: Option<&CycleConfig>,
    today: NaiveDate,
) -> Result<MonthView, EngineError> {
    let grid = build_month_grid(year, month0)?;
    if let Some(config) = config {
        config.validate()?;
    }

    let first = grid[0].date;
    let last = grid[GRID_CELLS - 1].date;
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for e in entries {
        let day = e.occurred_at.calendar_date();
        if day >= first && day <= last {
            by_day.entry(day).or_default().push(e.value);
        }
    }

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for cell in grid {
        let values = by_day.get(&cell.date).map(Vec::as_slice).unwrap_or(&[]);
        let average_value = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };
        let phase = match config {
            Some(config) => Some(phase_for_date(config, cell.date)?),
            None => None,
        };
        cells.push(MonthCell {
            date: cell.date,
            is_current_month: cell.is_current_month,
            is_today: cell.date == today,
            entry_count: values.len(),
            average_value,
            phase,
        });
    }

    debug!(logged_days = by_day.len(), "built month view");
    Ok(MonthView {
        year,
        month0,
        cells,
    })
}
