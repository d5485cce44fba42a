//! Roll conventions for periodic schedules.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// The day on which regular schedule dates fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RollConvention {
    /// Roll on a fixed day of the month (1-30), clamped to the month length.
    Day(u32),
    /// Roll on the last day of the month.
    Eom,
    /// No roll convention; dates keep the day produced by period arithmetic.
    #[default]
    None,
    /// IMM settlement dates (third Wednesday).
    Imm,
    /// Sydney Futures Exchange dates (second Friday).
    Sfe,
    /// Floating rate note convention.
    Frn,
    /// US Treasury bill auction dates.
    Tbill,
    /// Roll on a day of the week.
    Weekday(Weekday),
}

impl RollConvention {
    /// Moves `date` onto this roll day within its month.
    ///
    /// Only day-of-month, `EOM` and `NONE` conventions apply to a single date.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConvention` for every other convention.
    pub fn apply(&self, date: Date) -> CoreResult<Date> {
        match self {
            RollConvention::Day(day) => Ok(date.with_day_clamped(*day)),
            RollConvention::Eom => Ok(date.end_of_month()),
            RollConvention::None => Ok(date),
            other => Err(CoreError::invalid_convention(format!(
                "Roll convention {other}: supplied value is not supported"
            ))),
        }
    }
}

impl fmt::Display for RollConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollConvention::Day(day) => write!(f, "{day}"),
            RollConvention::Eom => write!(f, "EOM"),
            RollConvention::None => write!(f, "NONE"),
            RollConvention::Imm => write!(f, "IMM"),
            RollConvention::Sfe => write!(f, "SFE"),
            RollConvention::Frn => write!(f, "FRN"),
            RollConvention::Tbill => write!(f, "TBILL"),
            RollConvention::Weekday(weekday) => {
                let code = match weekday {
                    Weekday::Mon => "MON",
                    Weekday::Tue => "TUE",
                    Weekday::Wed => "WED",
                    Weekday::Thu => "THU",
                    Weekday::Fri => "FRI",
                    Weekday::Sat => "SAT",
                    Weekday::Sun => "SUN",
                };
                write!(f, "{code}")
            }
        }
    }
}

impl FromStr for RollConvention {
    type Err = CoreError;

    /// Parses FpML roll convention codes: `"1"`..`"30"`, `"EOM"`, `"NONE"`,
    /// `"IMM"`, `"SFE"`, `"FRN"`, `"TBILL"`, `"MON"`..`"SUN"`.
    /// The enum-style names `"Item15"` are also accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let digits = normalized.strip_prefix("ITEM").unwrap_or(&normalized);
        if let Ok(day) = digits.parse::<u32>() {
            return if (1..=30).contains(&day) {
                Ok(RollConvention::Day(day))
            } else {
                Err(CoreError::invalid_convention(format!(
                    "Unknown roll convention: {s}"
                )))
            };
        }
        match normalized.as_str() {
            "EOM" => Ok(RollConvention::Eom),
            "NONE" => Ok(RollConvention::None),
            "IMM" => Ok(RollConvention::Imm),
            "SFE" => Ok(RollConvention::Sfe),
            "FRN" => Ok(RollConvention::Frn),
            "TBILL" => Ok(RollConvention::Tbill),
            "MON" => Ok(RollConvention::Weekday(Weekday::Mon)),
            "TUE" => Ok(RollConvention::Weekday(Weekday::Tue)),
            "WED" => Ok(RollConvention::Weekday(Weekday::Wed)),
            "THU" => Ok(RollConvention::Weekday(Weekday::Thu)),
            "FRI" => Ok(RollConvention::Weekday(Weekday::Fri)),
            "SAT" => Ok(RollConvention::Weekday(Weekday::Sat)),
            "SUN" => Ok(RollConvention::Weekday(Weekday::Sun)),
            _ => Err(CoreError::invalid_convention(format!(
                "Unknown roll convention: {s}"
            ))),
        }
    }
}
