//! Business centre holiday records.

use serde::{Deserialize, Serialize};

use crate::types::Date;

/// One holiday or significant date attributed to a named business centre.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignificantDay {
    /// The date the day falls on.
    pub date: Date,
    /// The date the day is observed (usually equal to `date`).
    pub observed_date: Date,
    /// Business centre or holiday name.
    pub name: String,
}

impl SignificantDay {
    /// Creates a significant day observed on its own date.
    #[must_use]
    pub fn new(date: Date, name: impl Into<String>) -> Self {
        Self {
            date,
            observed_date: date,
            name: name.into(),
        }
    }
}

/// A dated holiday rule for a business centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRule {
    /// Holiday name, e.g. "Australia Day".
    pub name: String,
    /// The date the holiday is observed.
    pub date: Date,
}

impl DateRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(name: impl Into<String>, date: Date) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

/// Holidays of one business centre, merged from per-year records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusinessCenterCalendar {
    /// Business centre code, e.g. "AUSY".
    pub business_center: String,
    /// Location code.
    #[serde(default)]
    pub location: String,
    /// Human readable location.
    #[serde(default)]
    pub location_name: String,
    /// Holiday rules, in insertion order.
    #[serde(default)]
    pub holidays: Vec<DateRule>,
}

impl BusinessCenterCalendar {
    /// Creates an empty calendar for a business centre.
    #[must_use]
    pub fn new(business_center: impl Into<String>) -> Self {
        Self {
            business_center: business_center.into(),
            ..Self::default()
        }
    }

    /// Appends the holidays of another record for the same centre.
    ///
    /// The merge is additive; duplicates are removed when the calendar is
    /// flattened with [`significant_days`](Self::significant_days).
    pub fn merge(&mut self, other: &BusinessCenterCalendar) {
        self.holidays.extend(other.holidays.iter().cloned());
    }

    /// Distinct holiday dates, sorted ascending, attributed to this centre.
    #[must_use]
    pub fn significant_days(&self) -> Vec<SignificantDay> {
        let mut days: Vec<SignificantDay> = self
            .holidays
            .iter()
            .map(|rule| SignificantDay::new(rule.date, self.business_center.clone()))
            .collect();
        days.sort_by_key(|day| day.date);
        days.dedup_by_key(|day| day.date);
        days
    }

    /// Significant days restricted to the given years.
    #[must_use]
    pub fn significant_days_in_years(&self, years: &[i32]) -> Vec<SignificantDay> {
        self.significant_days()
            .into_iter()
            .filter(|day| years.contains(&day.date.year()))
            .collect()
    }
}
