//! Date rule helpers used to derive holidays.
//!
//! Holidays that are not fixed dates are generated from rules such as
//! "first Monday in October" or "Easter Sunday minus two days". The helpers
//! here evaluate those rules for a given year and apply the weekend roll that
//! determines the observed date.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::SignificantDay;
use crate::error::{CoreError, CoreResult};
use crate::types::{days_in_month, Date};

/// How a holiday falling on a weekend is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeekendRoll {
    /// Observed on the day itself.
    #[default]
    None,
    /// Saturday and Sunday move forward to Monday.
    ForwardToMonday,
    /// Saturday and Sunday move back to Friday.
    BackToFriday,
    /// Saturday moves back to Friday, Sunday forward to Monday.
    BeforeAfterWeekend,
    /// Only Saturday moves back to Friday.
    PriorIfSaturday,
}

impl WeekendRoll {
    /// Applies the roll to a date.
    #[must_use]
    pub fn apply(&self, date: Date) -> Date {
        match self {
            WeekendRoll::None => date,
            WeekendRoll::ForwardToMonday => roll_weekend_forward_to_monday(date),
            WeekendRoll::BackToFriday => roll_weekend_back_to_friday(date),
            WeekendRoll::BeforeAfterWeekend => roll_weekend_before_after(date),
            WeekendRoll::PriorIfSaturday => roll_before_weekend_if_saturday(date),
        }
    }
}

/// Fixed-date holiday with its observed date.
pub fn day_in_month_holiday(
    year: i32,
    month: u32,
    day: u32,
    roll: WeekendRoll,
    name: &str,
) -> CoreResult<SignificantDay> {
    let date = Date::from_ymd(year, month, day)?;
    Ok(SignificantDay {
        date,
        observed_date: roll.apply(date),
        name: name.to_string(),
    })
}

/// Easter Sunday for a Gregorian year (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> CoreResult<Date> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    Date::from_ymd(year, month as u32, day as u32)
}

/// Good Friday: two days before Easter Sunday.
pub fn good_friday(year: i32) -> CoreResult<Date> {
    Ok(easter_sunday(year)?.add_days(-2))
}

/// Easter Monday: the day after Easter Sunday.
pub fn easter_monday(year: i32) -> CoreResult<Date> {
    Ok(easter_sunday(year)?.add_days(1))
}

/// The `nth` occurrence (1-4) of `weekday` in a month.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` when `nth` is outside 1-4.
pub fn nth_weekday_in_month(year: i32, month: u32, nth: u32, weekday: Weekday) -> CoreResult<Date> {
    if !(1..=4).contains(&nth) {
        return Err(CoreError::invalid_argument(
            "Invalid instance specified. Must be in range 1-4",
        ));
    }
    let mut first = Date::from_ymd(year, month, 1)?;
    while first.weekday() != weekday {
        first = first.add_days(1);
    }
    Ok(first.add_days(7 * i64::from(nth - 1)))
}

/// The last occurrence of `weekday` in a month.
pub fn last_weekday_in_month(year: i32, month: u32, weekday: Weekday) -> CoreResult<Date> {
    let mut date = Date::from_ymd(year, month, days_in_month(year, month))?;
    while date.weekday() != weekday {
        date = date.add_days(-1);
    }
    Ok(date)
}

/// First date walking from `from` towards `to` (inclusive) that falls on `weekday`.
#[must_use]
pub fn first_day_of_week_between(from: Date, to: Date, weekday: Weekday) -> Option<Date> {
    walk_between(from, to, |date| date.weekday() == weekday)
}

/// First weekday walking from `from` towards `to` (inclusive).
#[must_use]
pub fn first_weekday_between(from: Date, to: Date) -> Option<Date> {
    walk_between(from, to, |date| date.is_weekday())
}

fn walk_between(from: Date, to: Date, found: impl Fn(Date) -> bool) -> Option<Date> {
    let step = if from <= to { 1 } else { -1 };
    let mut current = from;
    loop {
        if found(current) {
            return Some(current);
        }
        if current == to {
            return None;
        }
        current = current.add_days(step);
    }
}

/// Saturday and Sunday move forward to the following Monday.
#[must_use]
pub fn roll_weekend_forward_to_monday(date: Date) -> Date {
    match date.weekday() {
        Weekday::Sat => date.add_days(2),
        Weekday::Sun => date.add_days(1),
        _ => date,
    }
}

/// Saturday and Sunday move back to the preceding Friday.
#[must_use]
pub fn roll_weekend_back_to_friday(date: Date) -> Date {
    match date.weekday() {
        Weekday::Sat => date.add_days(-1),
        Weekday::Sun => date.add_days(-2),
        _ => date,
    }
}

/// Saturday moves back to Friday and Sunday forward to Monday.
#[must_use]
pub fn roll_weekend_before_after(date: Date) -> Date {
    match date.weekday() {
        Weekday::Sat => roll_weekend_back_to_friday(date),
        Weekday::Sun => roll_weekend_forward_to_monday(date),
        _ => date,
    }
}

/// Only a Saturday moves back to Friday.
#[must_use]
pub fn roll_before_weekend_if_saturday(date: Date) -> Date {
    if date.weekday() == Weekday::Sat {
        date.add_days(-1)
    } else {
        date
    }
}

/// Vernal equinox day (March) per the Japanese almanac formula, valid 1980-2099.
pub fn vernal_equinox(year: i32) -> CoreResult<Date> {
    equinox(year, 3, 20.8431)
}

/// Autumnal equinox day (September) per the Japanese almanac formula, valid 1980-2099.
pub fn autumnal_equinox(year: i32) -> CoreResult<Date> {
    equinox(year, 9, 23.2488)
}

fn equinox(year: i32, month: u32, base: f64) -> CoreResult<Date> {
    let elapsed = year - 1980;
    let day = (base + 0.242194 * f64::from(elapsed)).floor() as i32 - elapsed.div_euclid(4);
    Date::from_ymd(year, month, day as u32)
}

/// Removes duplicate dates and sorts the rest ascending.
#[must_use]
pub fn dedupe_dates(dates: &[Date]) -> Vec<Date> {
    let mut out = dates.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_easter() {
        assert_eq!(easter_sunday(2024).unwrap(), d(2024, 3, 31));
        assert_eq!(easter_sunday(2025).unwrap(), d(2025, 4, 20));
        assert_eq!(easter_sunday(2000).unwrap(), d(2000, 4, 23));
        assert_eq!(good_friday(2024).unwrap(), d(2024, 3, 29));
        assert_eq!(easter_monday(2024).unwrap(), d(2024, 4, 1));
    }

    #[test]
    fn test_nth_weekday() {
        // Australian Labour Day (NSW): first Monday in October
        assert_eq!(
            nth_weekday_in_month(2024, 10, 1, Weekday::Mon).unwrap(),
            d(2024, 10, 7)
        );
        // US Thanksgiving: fourth Thursday in November
        assert_eq!(
            nth_weekday_in_month(2024, 11, 4, Weekday::Thu).unwrap(),
            d(2024, 11, 28)
        );
        assert!(nth_weekday_in_month(2024, 11, 5, Weekday::Thu).is_err());
        assert!(nth_weekday_in_month(2024, 11, 0, Weekday::Thu).is_err());
    }

    #[test]
    fn test_last_weekday() {
        // US Memorial Day: last Monday in May
        assert_eq!(
            last_weekday_in_month(2024, 5, Weekday::Mon).unwrap(),
            d(2024, 5, 27)
        );
    }

    #[test]
    fn test_weekend_rolls() {
        let saturday = d(2024, 1, 13);
        let sunday = d(2024, 1, 14);
        assert_eq!(roll_weekend_forward_to_monday(saturday), d(2024, 1, 15));
        assert_eq!(roll_weekend_back_to_friday(sunday), d(2024, 1, 12));
        assert_eq!(roll_weekend_before_after(saturday), d(2024, 1, 12));
        assert_eq!(roll_weekend_before_after(sunday), d(2024, 1, 15));
        assert_eq!(roll_before_weekend_if_saturday(sunday), sunday);
    }

    #[test]
    fn test_day_in_month_holiday_observed() {
        // Christmas 2022 fell on a Sunday
        let christmas = day_in_month_holiday(2022, 12, 25, WeekendRoll::ForwardToMonday, "Christmas").unwrap();
        assert_eq!(christmas.date, d(2022, 12, 25));
        assert_eq!(christmas.observed_date, d(2022, 12, 26));
    }

    #[test]
    fn test_first_between() {
        assert_eq!(
            first_weekday_between(d(2024, 1, 13), d(2024, 1, 20)),
            Some(d(2024, 1, 15))
        );
        assert_eq!(
            first_weekday_between(d(2024, 1, 14), d(2024, 1, 13)),
            None
        );
        assert_eq!(
            first_day_of_week_between(d(2024, 1, 20), d(2024, 1, 1), Weekday::Wed),
            Some(d(2024, 1, 17))
        );
    }

    #[test]
    fn test_equinoxes() {
        assert_eq!(vernal_equinox(2024).unwrap(), d(2024, 3, 20));
        assert_eq!(vernal_equinox(2023).unwrap(), d(2023, 3, 21));
        assert_eq!(autumnal_equinox(2024).unwrap(), d(2024, 9, 22));
    }

    #[test]
    fn test_dedupe_dates() {
        let dates = [d(2024, 3, 1), d(2024, 1, 1), d(2024, 3, 1)];
        assert_eq!(dedupe_dates(&dates), vec![d(2024, 1, 1), d(2024, 3, 1)]);
    }
}
