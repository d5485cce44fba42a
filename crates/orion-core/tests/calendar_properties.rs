//! Property and scenario tests for business calendars and conventions.

use orion_core::calendars::{
    BusinessCalendar, BusinessDayConvention, HolidayCalendar, SignificantDay,
};
use orion_core::types::{Date, DayType, Period, PeriodUnit};
use proptest::prelude::*;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

/// A Sydney-like calendar with the 2024 national holidays.
fn ausy_2024() -> HolidayCalendar {
    let days = [
        d(2024, 1, 1),
        d(2024, 1, 26),
        d(2024, 3, 29),
        d(2024, 4, 1),
        d(2024, 4, 25),
        d(2024, 6, 10),
        d(2024, 8, 5),
        d(2024, 10, 7),
        d(2024, 12, 25),
        d(2024, 12, 26),
    ]
    .into_iter()
    .map(|date| SignificantDay::new(date, "AUSY"))
    .collect();
    HolidayCalendar::new("AUSY", days)
}

fn date_strategy() -> impl Strategy<Value = Date> {
    (0i64..3650).prop_map(|offset| d(2020, 1, 1).add_days(offset))
}

fn rolling_convention() -> impl Strategy<Value = BusinessDayConvention> {
    prop_oneof![
        Just(BusinessDayConvention::None),
        Just(BusinessDayConvention::Following),
        Just(BusinessDayConvention::ModFollowing),
        Just(BusinessDayConvention::Preceding),
        Just(BusinessDayConvention::ModPreceding),
        Just(BusinessDayConvention::Nearest),
    ]
}

#[test]
fn ausy_following_roll_across_saturday() {
    let cal = ausy_2024();
    let saturday = d(2024, 1, 13);
    assert!(!cal.is_business_day(saturday));
    assert!(!cal.is_business_day(d(2024, 1, 14)));
    assert_eq!(
        cal.roll(saturday, BusinessDayConvention::Following).unwrap(),
        d(2024, 1, 15)
    );
}

#[test]
fn business_day_advance_from_friday_skips_weekend() {
    let cal = HolidayCalendar::hell();
    let friday = d(2024, 1, 12);
    let result = cal
        .advance(friday, 3, PeriodUnit::Day, DayType::Business, BusinessDayConvention::None)
        .unwrap();
    assert_eq!(result, friday.add_days(5));
    assert_eq!(result.weekday(), chrono::Weekday::Wed);
}

#[test]
fn business_day_advance_skips_holidays() {
    let cal = ausy_2024();
    // Thursday 25 Jan + 1 business day skips Australia Day and the weekend
    let result = cal
        .advance(d(2024, 1, 25), 1, PeriodUnit::Day, DayType::Business, BusinessDayConvention::Following)
        .unwrap();
    assert_eq!(result, d(2024, 1, 29));
    let back = cal
        .advance(d(2024, 1, 29), -1, PeriodUnit::Day, DayType::Business, BusinessDayConvention::Following)
        .unwrap();
    assert_eq!(back, d(2024, 1, 25));
}

#[test]
fn easter_modified_following() {
    let cal = ausy_2024();
    // Good Friday 29 March 2024 rolls past Easter Monday into April, so back to Thursday
    assert_eq!(
        cal.roll(d(2024, 3, 29), BusinessDayConvention::ModFollowing).unwrap(),
        d(2024, 3, 28)
    );
}

proptest! {
    #[test]
    fn roll_is_idempotent(date in date_strategy(), convention in rolling_convention()) {
        let cal = ausy_2024();
        let once = cal.roll(date, convention).unwrap();
        let twice = cal.roll(once, convention).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn roll_of_business_day_is_identity(date in date_strategy(), convention in rolling_convention()) {
        let cal = ausy_2024();
        prop_assume!(cal.is_business_day(date));
        prop_assert_eq!(cal.roll(date, convention).unwrap(), date);
    }

    #[test]
    fn weekends_are_never_business_days(date in date_strategy()) {
        let cal = ausy_2024();
        if date.is_weekend() {
            prop_assert!(!cal.is_business_day(date));
            prop_assert!(!HolidayCalendar::hell().is_business_day(date));
        }
        prop_assert_eq!(cal.is_holiday(date), !cal.is_business_day(date));
    }

    #[test]
    fn calendar_day_period_round_trips(date in date_strategy(), n in -400i32..400, weeks in any::<bool>()) {
        let period = if weeks { Period::weeks(n) } else { Period::days(n) };
        let there = period.add(date).unwrap();
        let back = period.negate().add(there).unwrap();
        prop_assert_eq!(back, date);
    }

    #[test]
    fn business_day_steps_are_monotone(date in date_strategy(), n in -30i32..30) {
        let cal = ausy_2024();
        let result = cal
            .advance(date, n, PeriodUnit::Day, DayType::Business, BusinessDayConvention::Following)
            .unwrap();
        if n > 0 {
            prop_assert!(result >= date);
            prop_assert!(cal.is_business_day(result));
            prop_assert_eq!(cal.business_days_between_dates(date.add_days(1), result).len(), n as usize);
        } else if n < 0 {
            prop_assert!(result <= date);
            prop_assert!(cal.is_business_day(result));
        } else {
            prop_assert_eq!(result, cal.roll(date, BusinessDayConvention::Following).unwrap());
        }
    }

    #[test]
    fn holidays_and_business_days_partition_weekdays(start in date_strategy(), len in 0i64..120) {
        let cal = ausy_2024();
        let end = start.add_days(len);
        let holidays = cal.holidays_between_dates(start, end);
        let business = cal.business_days_between_dates(start, end);
        let weekday_holidays = holidays.iter().filter(|h| h.is_weekday()).count();
        let weekdays = (0..=len).filter(|i| start.add_days(*i).is_weekday()).count();
        prop_assert_eq!(weekday_holidays + business.len(), weekdays);
    }
}
