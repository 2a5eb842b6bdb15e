//! Calendar-day helpers shared by every calculator.
//!
//! All day arithmetic goes through [`CalendarDate`], which drops the
//! time-of-day before subtracting. Two timestamps on the same local day are
//! always zero days apart, whatever their hours.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone};

/// Anything that sits on a local calendar day.
pub trait CalendarDate {
    fn calendar_date(&self) -> NaiveDate;
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDate for NaiveDateTime {
    fn calendar_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn calendar_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDate + ?Sized> CalendarDate for &T {
    fn calendar_date(&self) -> NaiveDate {
        (**self).calendar_date()
    }
}

/// Whole calendar days from `a` to `b`. Negative when `b` is before `a`.
pub fn days_between(a: impl CalendarDate, b: impl CalendarDate) -> i64 {
    (b.calendar_date() - a.calendar_date()).num_days()
}

/// 1-indexed day within a cycle of `cycle_length` days.
///
/// `days_since_anchor` may be negative; the result is always in
/// `1..=cycle_length`. Returns `None` when `cycle_length` is zero.
pub fn cycle_day_of(days_since_anchor: i64, cycle_length: u32) -> Option<u32> {
    let offset = days_since_anchor.checked_rem_euclid(i64::from(cycle_length))?;
    Some(offset as u32 + 1)
}

pub fn same_calendar_day(a: impl CalendarDate, b: impl CalendarDate) -> bool {
    a.calendar_date() == b.calendar_date()
}

/// Day of week with Sunday = 0.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// `date` shifted by `days` (either direction), or `None` past chrono's date range.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// First day of the month, with `month0` in `0..=11`.
pub fn first_of_month(year: i32, month0: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0.checked_add(1)?, 1)
}

pub fn days_in_month(year: i32, month0: u32) -> Option<u32> {
    let first = first_of_month(year, month0)?;
    let next = if month0 == 11 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month0 + 2, 1)?
    };
    Some((next - first).num_days() as u32)
}
