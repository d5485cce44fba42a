//! Periods, day types and offsets.
//!
//! A [`Period`] is a signed multiplier of a [`PeriodUnit`] (`"3M"`, `"10Y"`,
//! `"-2D"`). An [`Offset`] is a period plus the [`DayType`] used when it is
//! applied to a date.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// Time unit of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum PeriodUnit {
    /// Calendar or business days.
    #[serde(rename = "D")]
    Day,
    /// Weeks of seven calendar days.
    #[serde(rename = "W")]
    Week,
    /// Calendar months.
    #[serde(rename = "M")]
    Month,
    /// Calendar years.
    #[serde(rename = "Y")]
    Year,
}

impl PeriodUnit {
    /// The single-letter code of the unit.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            PeriodUnit::Day => 'D',
            PeriodUnit::Week => 'W',
            PeriodUnit::Month => 'M',
            PeriodUnit::Year => 'Y',
        }
    }

    /// Parses a unit letter, case-insensitively.
    pub fn from_code(code: char) -> CoreResult<Self> {
        match code.to_ascii_uppercase() {
            'D' => Ok(PeriodUnit::Day),
            'W' => Ok(PeriodUnit::Week),
            'M' => Ok(PeriodUnit::Month),
            'Y' => Ok(PeriodUnit::Year),
            other => Err(CoreError::invalid_period(other.to_string())),
        }
    }

    fn is_month_based(self) -> bool {
        matches!(self, PeriodUnit::Month | PeriodUnit::Year)
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for PeriodUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => PeriodUnit::from_code(c),
            _ => Err(CoreError::invalid_period(s)),
        }
    }
}

/// Whether an offset counts business days or calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayType {
    /// Only good business days are counted.
    Business,
    /// Every calendar day is counted.
    #[default]
    Calendar,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayType::Business => "Business",
            DayType::Calendar => "Calendar",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DayType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => Ok(DayType::Business),
            "calendar" => Ok(DayType::Calendar),
            _ => Err(CoreError::invalid_argument(format!("Unknown day type: {s}"))),
        }
    }
}

/// A signed number of period units, e.g. `3M` or `-2D`.
///
/// Parsing is string based and round-trips through [`fmt::Display`]:
///
/// ```rust
/// use orion_core::types::Period;
///
/// let p: Period = "10Y".parse().unwrap();
/// assert_eq!(p.to_string(), "10Y");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Signed number of units.
    pub multiplier: i32,
    /// The unit.
    pub unit: PeriodUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(multiplier: i32, unit: PeriodUnit) -> Self {
        Self { multiplier, unit }
    }

    /// `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, PeriodUnit::Day)
    }

    /// `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, PeriodUnit::Week)
    }

    /// `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, PeriodUnit::Month)
    }

    /// `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, PeriodUnit::Year)
    }

    /// The same period with the sign flipped.
    #[must_use]
    pub const fn negate(&self) -> Self {
        Self::new(-self.multiplier, self.unit)
    }

    /// Adds the period to a date using calendar arithmetic.
    ///
    /// Months and years clamp the day to the end of the target month.
    pub fn add(&self, date: Date) -> CoreResult<Date> {
        let n = self.multiplier;
        match self.unit {
            PeriodUnit::Day => Ok(date.add_days(i64::from(n))),
            PeriodUnit::Week => Ok(date.add_days(7 * i64::from(n))),
            PeriodUnit::Month => date.add_months(n),
            PeriodUnit::Year => date.add_years(n),
        }
    }

    /// Subtracts the period from a date.
    pub fn subtract(&self, date: Date) -> CoreResult<Date> {
        self.negate().add(date)
    }

    /// Approximate length in years (`D` = 1/365, `W` = 7/365, `M` = 1/12).
    #[must_use]
    pub fn to_years(&self) -> f64 {
        let n = f64::from(self.multiplier);
        match self.unit {
            PeriodUnit::Day => n / 365.0,
            PeriodUnit::Week => 7.0 * n / 365.0,
            PeriodUnit::Month => n / 12.0,
            PeriodUnit::Year => n,
        }
    }

    /// Total length in months, for month based units.
    #[must_use]
    pub fn to_months(&self) -> Option<i32> {
        match self.unit {
            PeriodUnit::Month => Some(self.multiplier),
            PeriodUnit::Year => Some(12 * self.multiplier),
            _ => None,
        }
    }

    /// Total length in days, for day based units.
    #[must_use]
    pub fn to_days(&self) -> Option<i32> {
        match self.unit {
            PeriodUnit::Day => Some(self.multiplier),
            PeriodUnit::Week => Some(7 * self.multiplier),
            _ => None,
        }
    }

    /// How many whole `divisor` periods fit in `self`.
    ///
    /// Month based periods are compared in months, day based periods in days,
    /// and mixed units in years.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Arithmetic` if the division leaves a remainder.
    pub fn divide(&self, divisor: &Period) -> CoreResult<i32> {
        let not_whole = || {
            CoreError::arithmetic(
                "The period frequency will not roll to the supplied termination date interval",
            )
        };
        if divisor.multiplier == 0 {
            return Err(not_whole());
        }
        let (num, den) = match (self.unit.is_month_based(), divisor.unit.is_month_based()) {
            (true, true) => (self.to_months(), divisor.to_months()),
            (false, false) => (self.to_days(), divisor.to_days()),
            _ => {
                let ratio = self.to_years() / divisor.to_years();
                let rounded = ratio.round();
                return if (ratio - rounded).abs() < 1e-9 {
                    Ok(rounded as i32)
                } else {
                    Err(not_whole())
                };
            }
        };
        match (num, den) {
            (Some(n), Some(d)) if n % d == 0 => Ok(n / d),
            _ => Err(not_whole()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiplier, self.unit)
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unit_char = trimmed
            .chars()
            .last()
            .ok_or_else(|| CoreError::invalid_period(s))?;
        let unit = PeriodUnit::from_code(unit_char).map_err(|_| CoreError::invalid_period(s))?;
        let digits = &trimmed[..trimmed.len() - unit_char.len_utf8()];
        let multiplier = digits
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_period(s))?;
        Ok(Period::new(multiplier, unit))
    }
}

/// A period plus the day type used to apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    /// Period to apply.
    pub period: Period,
    /// Day type; `None` when not specified.
    pub day_type: Option<DayType>,
}

impl Offset {
    /// Creates an offset.
    #[must_use]
    pub const fn new(period: Period, day_type: Option<DayType>) -> Self {
        Self { period, day_type }
    }

    /// `n` business days.
    #[must_use]
    pub const fn business_days(n: i32) -> Self {
        Self::new(Period::days(n), Some(DayType::Business))
    }

    /// `n` calendar days.
    #[must_use]
    pub const fn calendar_days(n: i32) -> Self {
        Self::new(Period::days(n), Some(DayType::Calendar))
    }

    /// Adds the period with calendar arithmetic, ignoring the day type.
    pub fn add(&self, date: Date) -> CoreResult<Date> {
        self.period.add(date)
    }
}
