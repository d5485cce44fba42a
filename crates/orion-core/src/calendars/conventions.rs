//! Business day conventions, rolling and advancing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::BusinessCalendar;
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, DayType, Period, PeriodUnit};

/// Business day adjustment conventions.
///
/// These conventions specify how to move a date that falls
/// on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// No adjustment - use the date as-is even if not a business day.
    #[serde(rename = "NONE")]
    None,

    /// Move to the following business day.
    #[default]
    #[serde(rename = "FOLLOWING")]
    Following,

    /// Move to the following business day, unless it crosses a month boundary,
    /// in which case move to the preceding business day.
    #[serde(rename = "MODFOLLOWING")]
    ModFollowing,

    /// Move to the preceding business day.
    #[serde(rename = "PRECEDING")]
    Preceding,

    /// Move to the preceding business day, unless it crosses a month boundary,
    /// in which case move to the following business day.
    #[serde(rename = "MODPRECEDING")]
    ModPreceding,

    /// Move to the nearest business day (following or preceding, whichever is closer).
    #[serde(rename = "NEAREST")]
    Nearest,

    /// Floating rate note convention. Recognised but cannot roll a single date.
    #[serde(rename = "FRN")]
    Frn,

    /// Placeholder for adjustments that do not apply.
    NotApplicable,
}

impl BusinessDayConvention {
    /// The FpML code of the convention.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            BusinessDayConvention::None => "NONE",
            BusinessDayConvention::Following => "FOLLOWING",
            BusinessDayConvention::ModFollowing => "MODFOLLOWING",
            BusinessDayConvention::Preceding => "PRECEDING",
            BusinessDayConvention::ModPreceding => "MODPRECEDING",
            BusinessDayConvention::Nearest => "NEAREST",
            BusinessDayConvention::Frn => "FRN",
            BusinessDayConvention::NotApplicable => "NotApplicable",
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for BusinessDayConvention {
    type Err = CoreError;

    /// Parses FpML codes (`"MODFOLLOWING"`) and spelled-out names
    /// (`"Modified Following"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_uppercase();

        match normalized.as_str() {
            "NONE" | "UNADJUSTED" => Ok(BusinessDayConvention::None),
            "FOLLOWING" | "F" => Ok(BusinessDayConvention::Following),
            "MODFOLLOWING" | "MODIFIEDFOLLOWING" | "MF" => Ok(BusinessDayConvention::ModFollowing),
            "PRECEDING" | "P" => Ok(BusinessDayConvention::Preceding),
            "MODPRECEDING" | "MODIFIEDPRECEDING" | "MP" => Ok(BusinessDayConvention::ModPreceding),
            "NEAREST" => Ok(BusinessDayConvention::Nearest),
            "FRN" => Ok(BusinessDayConvention::Frn),
            "NOTAPPLICABLE" => Ok(BusinessDayConvention::NotApplicable),
            _ => Err(CoreError::invalid_convention(format!(
                "Unknown business day convention: {s}"
            ))),
        }
    }
}

/// Rolls a date onto a business day of `calendar` according to `convention`.
///
/// Rolling an existing business day returns it unchanged.
///
/// # Errors
///
/// Returns `CoreError::InvalidConvention` for `FRN` and `NotApplicable`.
pub fn roll<C: BusinessCalendar + ?Sized>(
    calendar: &C,
    date: Date,
    convention: BusinessDayConvention,
) -> CoreResult<Date> {
    match convention {
        BusinessDayConvention::None => Ok(date),

        BusinessDayConvention::Following => Ok(following(date, calendar)),

        BusinessDayConvention::ModFollowing => {
            let adjusted = following(date, calendar);
            if adjusted.month() != date.month() {
                // Crossed month boundary, go preceding instead
                Ok(preceding(date, calendar))
            } else {
                Ok(adjusted)
            }
        }

        BusinessDayConvention::Preceding => Ok(preceding(date, calendar)),

        BusinessDayConvention::ModPreceding => {
            let adjusted = preceding(date, calendar);
            if adjusted.month() != date.month() {
                // Crossed month boundary, go following instead
                Ok(following(date, calendar))
            } else {
                Ok(adjusted)
            }
        }

        BusinessDayConvention::Nearest => {
            let fwd = following(date, calendar);
            let back = preceding(date, calendar);
            if date.days_between(&fwd) <= back.days_between(&date) {
                Ok(fwd)
            } else {
                Ok(back)
            }
        }

        BusinessDayConvention::Frn | BusinessDayConvention::NotApplicable => Err(
            CoreError::invalid_convention(format!("Unknown rolling convention: {convention}")),
        ),
    }
}

/// Advances `date` by `multiplier` units and rolls the result.
///
/// Business day offsets step one day at a time, skipping holidays, and are
/// only defined for the day unit. A `NONE` convention with a non-zero
/// multiplier rolls in the direction of travel.
///
/// # Errors
///
/// Returns `CoreError::NotSupported` for business day offsets in weeks,
/// months or years.
pub fn advance<C: BusinessCalendar + ?Sized>(
    calendar: &C,
    date: Date,
    multiplier: i32,
    unit: PeriodUnit,
    day_type: DayType,
    convention: BusinessDayConvention,
) -> CoreResult<Date> {
    if day_type == DayType::Business && unit != PeriodUnit::Day {
        return Err(CoreError::not_supported(format!(
            "{unit} not supported in conjunction with '{day_type} day type'"
        )));
    }

    if convention == BusinessDayConvention::None {
        if multiplier == 0 {
            return Ok(date);
        }
        let directed = if multiplier > 0 {
            BusinessDayConvention::Following
        } else {
            BusinessDayConvention::Preceding
        };
        return advance(calendar, date, multiplier, unit, day_type, directed);
    }

    if multiplier == 0 {
        return roll(calendar, date, convention);
    }

    if day_type == DayType::Business {
        return Ok(step_business_days(calendar, date, multiplier));
    }

    let shifted = Period::new(multiplier, unit).add(date)?;
    roll(calendar, shifted, convention)
}

/// Moves `count` business days away from `date`; negative counts move back.
pub fn step_business_days<C: BusinessCalendar + ?Sized>(
    calendar: &C,
    date: Date,
    count: i32,
) -> Date {
    let direction = if count >= 0 { 1 } else { -1 };
    let mut current = date;
    for _ in 0..count.unsigned_abs() {
        current = current.add_days(direction);
        while !calendar.is_business_day(current) {
            current = current.add_days(direction);
        }
    }
    current
}

/// Returns the next business day on or after the given date.
fn following<C: BusinessCalendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(1);
    }
    date
}

/// Returns the previous business day on or before the given date.
fn preceding<C: BusinessCalendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(-1);
    }
    date
}
