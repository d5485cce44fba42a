//! Weekend + significant day calendars.

use serde::{Deserialize, Serialize};

use super::{BusinessCalendar, BusinessCenterCalendar, SignificantDay};
use crate::types::Date;

/// Name of the weekend-only default calendar.
pub const HELL_CALENDAR: &str = "Hell";

/// Sentinel centre name meaning "observe no holidays".
pub const NONE_CALENDAR: &str = "NONE";

/// A business calendar built from a set of significant days.
///
/// A date is a business day when it is neither a Saturday/Sunday nor one of the
/// held significant days. Dates are kept sorted and distinct so lookups are
/// binary searches; construction performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    name: String,
    significant_days: Vec<SignificantDay>,
    dates: Vec<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar from significant days.
    ///
    /// Entries sharing a date are collapsed to the first one.
    #[must_use]
    pub fn new(name: impl Into<String>, significant_days: Vec<SignificantDay>) -> Self {
        let mut significant_days = significant_days;
        significant_days.sort_by_key(|day| day.date);
        significant_days.dedup_by_key(|day| day.date);
        let dates = significant_days.iter().map(|day| day.date).collect();
        Self {
            name: name.into(),
            significant_days,
            dates,
        }
    }

    /// The weekend-only calendar: "holidays of nowhere".
    #[must_use]
    pub fn hell() -> Self {
        Self::new(HELL_CALENDAR, Vec::new())
    }

    /// Consolidates the holidays of several business centres.
    ///
    /// The calendar name is the centre codes joined by `-`.
    #[must_use]
    pub fn from_business_centers(centers: &[BusinessCenterCalendar]) -> Self {
        let name = centers
            .iter()
            .map(|center| center.business_center.as_str())
            .collect::<Vec<_>>()
            .join("-");
        let days = centers
            .iter()
            .flat_map(BusinessCenterCalendar::significant_days)
            .collect();
        Self::new(name, days)
    }

    /// The held significant days, sorted by date.
    #[must_use]
    pub fn significant_days(&self) -> &[SignificantDay] {
        &self.significant_days
    }

    /// The held holiday dates, sorted and distinct.
    #[must_use]
    pub fn holiday_dates(&self) -> &[Date] {
        &self.dates
    }

    /// Index of the first held date `>= date`.
    fn lower_bound(&self, date: Date) -> usize {
        match self.dates.binary_search(&date) {
            Ok(index) | Err(index) => index,
        }
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::hell()
    }
}

impl BusinessCalendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && self.dates.binary_search(&date).is_err()
    }

    /// Held significant dates in the closed interval `[start, end]`.
    fn holidays_between_dates(&self, start: Date, end: Date) -> Vec<Date> {
        if end < start {
            return Vec::new();
        }
        let from = self.lower_bound(start);
        let to = match self.dates.binary_search(&end) {
            Ok(index) => index + 1,
            Err(index) => index,
        };
        self.dates[from..to].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn ausy() -> HolidayCalendar {
        HolidayCalendar::new(
            "AUSY",
            vec![
                SignificantDay::new(d(2024, 12, 25), "AUSY"),
                SignificantDay::new(d(2024, 1, 26), "AUSY"),
                SignificantDay::new(d(2024, 1, 1), "AUSY"),
                SignificantDay::new(d(2024, 1, 26), "AUSY"),
            ],
        )
    }

    #[test]
    fn test_business_day_predicate() {
        let cal = ausy();
        assert!(!cal.is_business_day(d(2024, 1, 26)));
        assert!(!cal.is_business_day(d(2024, 1, 27))); // Saturday
        assert!(cal.is_business_day(d(2024, 1, 25)));
        assert!(cal.is_holiday(d(2024, 1, 1)));
    }

    #[test]
    fn test_duplicates_collapse() {
        let cal = ausy();
        assert_eq!(cal.holiday_dates().len(), 3);
        assert_eq!(cal.significant_days()[0].date, d(2024, 1, 1));
    }

    #[test]
    fn test_holidays_between_dates_closed_interval() {
        let cal = ausy();
        assert_eq!(
            cal.holidays_between_dates(d(2024, 1, 1), d(2024, 1, 26)),
            vec![d(2024, 1, 1), d(2024, 1, 26)]
        );
        assert_eq!(
            cal.holidays_between_dates(d(2024, 1, 2), d(2024, 12, 24)),
            vec![d(2024, 1, 26)]
        );
        assert!(cal
            .holidays_between_dates(d(2024, 2, 1), d(2024, 11, 30))
            .is_empty());
        assert!(cal
            .holidays_between_dates(d(2024, 12, 31), d(2024, 1, 1))
            .is_empty());
    }

    #[test]
    fn test_business_days_between_dates() {
        let cal = ausy();
        // Week of Australia Day 2024: Mon 22 - Sun 28, Friday is a holiday
        let days = cal.business_days_between_dates(d(2024, 1, 22), d(2024, 1, 28));
        assert_eq!(
            days,
            vec![d(2024, 1, 22), d(2024, 1, 23), d(2024, 1, 24), d(2024, 1, 25)]
        );
    }

    #[test]
    fn test_from_business_centers() {
        let mut sydney = BusinessCenterCalendar::new("AUSY");
        sydney
            .holidays
            .push(super::super::DateRule::new("Australia Day", d(2024, 1, 26)));
        let mut london = BusinessCenterCalendar::new("GBLO");
        london
            .holidays
            .push(super::super::DateRule::new("Boxing Day", d(2024, 12, 26)));

        let joint = HolidayCalendar::from_business_centers(&[sydney, london]);
        assert_eq!(joint.name(), "AUSY-GBLO");
        assert!(joint.is_holiday(d(2024, 1, 26)));
        assert!(joint.is_holiday(d(2024, 12, 26)));
    }

    #[test]
    fn test_hell_is_weekends_only() {
        let cal = HolidayCalendar::hell();
        assert_eq!(cal.name(), HELL_CALENDAR);
        assert!(cal.is_business_day(d(2024, 12, 25)));
        assert!(!cal.is_business_day(d(2024, 12, 28)));
    }
}
