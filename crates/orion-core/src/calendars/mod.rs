//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`BusinessCalendar`] trait: business day predicate, rolling and advancing
//! - [`HolidayCalendar`]: a weekend + significant day calendar for one or more
//!   business centres, including the weekend-only `Hell` calendar
//! - Business day adjustment conventions
//! - Date rule helpers and IMM/futures dates

mod business_center;
mod conventions;
mod holiday;
pub mod imm;
pub mod rules;

pub use business_center::{BusinessCenterCalendar, DateRule, SignificantDay};
pub use conventions::{advance, roll, step_business_days, BusinessDayConvention};
pub use holiday::{HolidayCalendar, HELL_CALENDAR, NONE_CALENDAR};

use crate::error::CoreResult;
use crate::types::{Date, DayType, Offset, PeriodUnit};

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a set of business centres. The invariant every implementation keeps is
/// `is_business_day(d) == !d.is_weekend() && !holiday(d)`.
pub trait BusinessCalendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday (including weekends).
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Rolls a date according to the given business day convention.
    fn roll(&self, date: Date, convention: BusinessDayConvention) -> CoreResult<Date> {
        conventions::roll(self, date, convention)
    }

    /// Advances a date by `multiplier` units of the given day type, then rolls.
    fn advance(
        &self,
        date: Date,
        multiplier: i32,
        unit: PeriodUnit,
        day_type: DayType,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        conventions::advance(self, date, multiplier, unit, day_type, convention)
    }

    /// Advances a date by an offset. An unspecified day type counts calendar days.
    fn advance_offset(
        &self,
        date: Date,
        offset: &Offset,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        self.advance(
            date,
            offset.period.multiplier,
            offset.period.unit,
            offset.day_type.unwrap_or(DayType::Calendar),
            convention,
        )
    }

    /// Weekday holidays in the closed interval `[start, end]`, in ascending order.
    fn holidays_between_dates(&self, start: Date, end: Date) -> Vec<Date> {
        let mut holidays = Vec::new();
        let mut current = start;
        while current <= end {
            if !current.is_weekend() && !self.is_business_day(current) {
                holidays.push(current);
            }
            current = current.add_days(1);
        }
        holidays
    }

    /// Every business day in the closed interval `[start, end]`.
    fn business_days_between_dates(&self, start: Date, end: Date) -> Vec<Date> {
        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            if self.is_business_day(current) {
                days.push(current);
            }
            current = current.add_days(1);
        }
        days
    }

    /// Whole years elapsed between two dates.
    fn years_between_dates(&self, start: Date, end: Date) -> i32 {
        let years = end.year() - start.year();
        if end.month() >= start.month() && end.day() < start.day() {
            years - 1
        } else {
            years
        }
    }
}
