//! Reference-data records read from the object cache.

use orion_core::calendars::{BusinessCenterCalendar, DateRule};
use orion_core::Date;
use serde::{Deserialize, Serialize};

/// A named calendar and the FpML business centre it maps to.
///
/// `"Sydney"` and `"AUSY"` both resolve to the profile
/// `{ name: "Sydney", fpml_name: "AUSY" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRuleProfile {
    /// Display name of the calendar.
    pub name: String,
    /// FpML business centre code.
    pub fpml_name: String,
    /// Disabled profiles never resolve.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Dated rules attached to the profile.
    #[serde(default)]
    pub rules: Vec<DateRule>,
}

fn default_enabled() -> bool {
    true
}

impl DateRuleProfile {
    /// An enabled profile with no rules.
    #[must_use]
    pub fn new(name: impl Into<String>, fpml_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fpml_name: fpml_name.into(),
            enabled: true,
            rules: Vec::new(),
        }
    }

    /// The same profile, disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// True if `requested` names this profile, ignoring case.
    pub fn answers_to(&self, requested: &str) -> bool {
        self.name.eq_ignore_ascii_case(requested) || self.fpml_name.eq_ignore_ascii_case(requested)
    }
}

/// Every date rule profile known to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRules {
    /// Profiles in load order.
    pub profiles: Vec<DateRuleProfile>,
}

impl DateRules {
    /// Wraps a list of profiles.
    #[must_use]
    pub fn new(profiles: Vec<DateRuleProfile>) -> Self {
        Self { profiles }
    }

    /// First enabled profile answering to `requested`.
    pub fn resolve(&self, requested: &str) -> Option<&DateRuleProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.enabled && profile.answers_to(requested))
    }
}

/// One holiday of a business centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// The observed date.
    pub date: Date,
    /// Holiday name.
    #[serde(default)]
    pub name: String,
}

impl HolidayRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(date: Date, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// Holidays stored for one business centre.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusinessCenterHolidays {
    /// FpML business centre code.
    pub business_center: String,
    /// Location code.
    #[serde(default)]
    pub location: String,
    /// Human readable location.
    #[serde(default)]
    pub location_name: String,
    /// Holidays, in load order.
    #[serde(default)]
    pub holidays: Vec<HolidayRecord>,
}

impl BusinessCenterHolidays {
    /// An empty record for a centre.
    #[must_use]
    pub fn new(business_center: impl Into<String>) -> Self {
        Self {
            business_center: business_center.into(),
            ..Self::default()
        }
    }

    /// Adds a holiday.
    #[must_use]
    pub fn with_holiday(mut self, date: Date, name: impl Into<String>) -> Self {
        self.holidays.push(HolidayRecord::new(date, name));
        self
    }

    /// Appends the holidays of another year file for the same centre.
    pub fn merge(&mut self, other: &BusinessCenterHolidays) {
        self.holidays.extend(other.holidays.iter().cloned());
    }

    /// Holiday dates in load order.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.holidays.iter().map(|holiday| holiday.date)
    }
}

impl From<&BusinessCenterHolidays> for BusinessCenterCalendar {
    fn from(record: &BusinessCenterHolidays) -> Self {
        BusinessCenterCalendar {
            business_center: record.business_center.clone(),
            location: record.location.clone(),
            location_name: record.location_name.clone(),
            holidays: record
                .holidays
                .iter()
                .map(|holiday| DateRule::new(holiday.name.clone(), holiday.date))
                .collect(),
        }
    }
}
